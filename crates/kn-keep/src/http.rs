//! Shared HTTP response helpers for the Keep endpoints.

use crate::error::KeepError;

/// Return the response unchanged on success, otherwise a [`KeepError::Api`]
/// carrying the status code and response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, KeepError> {
    if !resp.status().is_success() {
        return Err(KeepError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// `Location` header of a redirect response.
pub fn redirect_location(resp: &reqwest::Response) -> Option<String> {
    if !resp.status().is_redirection() {
        return None;
    }
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        )
    }

    fn mock_redirect(location: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(302)
                .header("Location", location)
                .body("")
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let err = check_response(mock_response(401)).await.unwrap_err();
        assert!(matches!(err, KeepError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200)).await.is_ok());
    }

    #[test]
    fn redirect_location_reads_header() {
        let resp = mock_redirect("https://lh3.googleusercontent.com/abc");
        assert_eq!(
            redirect_location(&resp).as_deref(),
            Some("https://lh3.googleusercontent.com/abc")
        );
    }

    #[test]
    fn redirect_location_requires_redirect_status() {
        assert!(redirect_location(&mock_response(200)).is_none());
    }
}
