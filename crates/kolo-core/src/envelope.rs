//! Legacy response envelope.
//!
//! Every endpoint answers with the same wire shape: successes carry
//! `status_code` "00" plus a `data` payload, failures carry a numeric
//! string code, a status label and the error detail, with `data` pinned
//! to the empty string.

use serde::Serialize;
use serde_json::{Value, json};

pub const SUCCESS_CODE: &str = "00";
pub const SUCCESS_STATUS: &str = "Success";

pub fn success<T: Serialize>(data: T) -> Value {
    json!({
        "status_code": SUCCESS_CODE,
        "status": SUCCESS_STATUS,
        "data": data,
    })
}

pub fn error<E: Serialize>(code: &str, status: &str, error_msg: &str, error: E) -> Value {
    json!({
        "status_code": code,
        "status": status,
        "error_msg": error_msg,
        "error": error,
        "data": "",
    })
}
