use crate::color_ops::parse_query;
use crate::model::Rgb;

pub(crate) fn validate_query_color(value: &str) -> Result<Rgb, String> {
    parse_query(value).map_err(|e| e.to_string())
}

pub(crate) fn validate_limit(value: &str) -> Result<usize, String> {
    let num = value
        .parse::<usize>()
        .map_err(|_| "Not a valid row count".to_string())?;
    if num == 0 {
        return Err("Number must be greater than 0".to_string());
    }
    Ok(num)
}
