use super::*;

pub(crate) fn validate_storage_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(anyhow::anyhow!("storage key cannot be empty"));
    }
    if key.len() > 512 {
        return Err(anyhow::anyhow!("storage key too long"));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(anyhow::anyhow!(
            "storage key must be alnum or '-', '_', '.', '/'"
        ));
    }
    if key.starts_with('/') || key.contains("//") {
        return Err(anyhow::anyhow!("storage key cannot have empty segments"));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(anyhow::anyhow!("storage key cannot traverse directories"));
    }
    Ok(())
}

pub(crate) fn validate_file_spec(spec: &FileSpec) -> Result<()> {
    if spec.filename.is_empty() {
        return Err(anyhow::anyhow!("filename cannot be empty"));
    }
    if spec.filename.contains('/') || spec.filename.contains('\\') {
        return Err(anyhow::anyhow!("filename cannot contain path separators"));
    }
    if bistro::media::file_extension(&spec.filename).is_none() {
        return Err(anyhow::anyhow!(
            "filename needs an extension: {}",
            spec.filename
        ));
    }
    if spec.content_type.is_empty() || !spec.content_type.contains('/') {
        return Err(anyhow::anyhow!(
            "invalid content type: {}",
            spec.content_type
        ));
    }
    Ok(())
}

fn validate_time(value: &str) -> Result<()> {
    let Some((hours, minutes)) = value.split_once(':') else {
        return Err(anyhow::anyhow!("time must be HH:MM, got {}", value));
    };
    let ok_hours = matches!(hours.len(), 1 | 2)
        && hours.chars().all(|c| c.is_ascii_digit())
        && hours.parse::<u32>().map(|h| h <= 23).unwrap_or(false);
    let ok_minutes = minutes.len() == 2
        && minutes.chars().all(|c| c.is_ascii_digit())
        && minutes.parse::<u32>().map(|m| m <= 59).unwrap_or(false);
    if !ok_hours || !ok_minutes {
        return Err(anyhow::anyhow!("time must be HH:MM, got {}", value));
    }
    Ok(())
}

fn validate_opening_hours(days: &[bistro::model::OpeningDay]) -> Result<()> {
    for day in days {
        if day.day.is_empty() {
            return Err(anyhow::anyhow!("opening day name cannot be empty"));
        }
        for window in &day.windows {
            validate_time(&window.from)?;
            validate_time(&window.to)?;
        }
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<()> {
    if phone.len() < 6
        || !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(anyhow::anyhow!("invalid phone number: {}", phone));
    }
    Ok(())
}

pub(crate) fn validate_create(req: &CreateRestaurant) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(anyhow::anyhow!("name cannot be empty"));
    }
    for key in &req.images {
        validate_storage_key(key.as_str())?;
    }
    validate_opening_hours(&req.opening_hours)?;
    if let Some(phone) = &req.phone_number {
        validate_phone(phone)?;
    }
    Ok(())
}

pub(crate) fn validate_update(patch: &UpdateRestaurant) -> Result<()> {
    if let Some(name) = &patch.name
        && name.trim().is_empty()
    {
        return Err(anyhow::anyhow!("name cannot be empty"));
    }
    if let Some(images) = &patch.images {
        for key in images {
            validate_storage_key(key.as_str())?;
        }
    }
    if let Some(days) = &patch.opening_hours {
        validate_opening_hours(days)?;
    }
    if let Some(phone) = &patch.phone_number {
        validate_phone(phone)?;
    }
    Ok(())
}
