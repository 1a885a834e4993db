use reqwest::Url;

/// # Errors
///
/// Will return `Err` if the value is not an absolute `http` or `https` url
pub fn check_http_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("'{value}' is not a valid url: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!(
            "'{value}' uses unsupported scheme '{other}', expected http or https."
        )),
    }
}
