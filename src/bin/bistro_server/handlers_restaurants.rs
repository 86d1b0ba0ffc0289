use super::*;

fn mint_record_id(name: &str, created_at: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(b"\n");
    hasher.update(created_at.as_bytes());
    hasher.finalize().to_hex().to_string()
}

pub(crate) async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRestaurant>,
) -> Result<(StatusCode, Json<RestaurantRecord>), Response> {
    validate_create(&req).map_err(bad_request)?;

    let created_at = now_ts();
    let id = mint_record_id(&req.name, &created_at);
    let record = RestaurantRecord {
        id: id.clone(),
        name: req.name,
        images: req.images,
        description: req.description,
        address: req.address,
        opening_hours: req.opening_hours,
        phone_number: req.phone_number,
        created_at: created_at.clone(),
        updated_at: created_at,
    };

    {
        let mut records = state.records.write().await;
        persist_record(&state, &record).map_err(internal_error)?;
        records.insert(id, record.clone());
    }

    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn list_restaurants(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<RestaurantRecord>> {
    let records = state.records.read().await;
    let mut out: Vec<_> = records.values().cloned().collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(out)
}

pub(crate) async fn get_restaurant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantRecord>, Response> {
    let records = state.records.read().await;
    let record = records.get(&id).ok_or_else(not_found)?;
    Ok(Json(record.clone()))
}

/// Partial update: only fields present in the body are applied. `images`
/// is a whole-field replace, which keeps each save's record write atomic
/// even though the surrounding protocol is not.
pub(crate) async fn patch_restaurant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateRestaurant>,
) -> Result<Json<RestaurantRecord>, Response> {
    validate_update(&patch).map_err(bad_request)?;

    let mut records = state.records.write().await;
    let record = records.get_mut(&id).ok_or_else(not_found)?;

    if let Some(name) = patch.name {
        record.name = name;
    }
    if let Some(images) = patch.images {
        record.images = images;
    }
    if let Some(description) = patch.description {
        record.description = Some(description);
    }
    if let Some(address) = patch.address {
        record.address = Some(address);
    }
    if let Some(opening_hours) = patch.opening_hours {
        record.opening_hours = opening_hours;
    }
    if let Some(phone_number) = patch.phone_number {
        record.phone_number = Some(phone_number);
    }
    record.updated_at = now_ts();

    persist_record(&state, record).map_err(internal_error)?;
    Ok(Json(record.clone()))
}

/// Removes the record only; stored objects it referenced are left behind.
pub(crate) async fn delete_restaurant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantRecord>, Response> {
    let mut records = state.records.write().await;
    let record = records.remove(&id).ok_or_else(not_found)?;
    remove_record_file(&state, &id).map_err(internal_error)?;
    Ok(Json(record))
}
