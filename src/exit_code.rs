use crate::error::CopsError;

pub fn exit_code_for_error(err: &CopsError) -> i32 {
    match err {
        CopsError::InvalidUrl(_) | CopsError::MissingBaseUrl => 3,
        CopsError::Config(_) => 2,
        CopsError::Rejected(_) => 22,
        CopsError::Io(_) => 23,
        CopsError::Json(_) => 26,
        CopsError::CookieStore(_) => 26,
        CopsError::Http(err) => http_exit_code(err),
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_request() {
        return 2;
    }
    43
}
