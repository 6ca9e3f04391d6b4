//! FFI interface for C/C++ hosts
//!
//! HTML goes in as bytes, the request as a JSON string; the formatted table
//! comes back as an owned C string.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::pipeline::{run_request, Request};

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via free_table_result
#[repr(C)]
pub struct TableResultFFI {
    /// Formatted table (null-terminated), or null on failure
    pub output_ptr: *mut c_char,
    /// Error message (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Extract a table from HTML according to a JSON request.
///
/// The request looks like
/// `{"source": {"kind": "time_ordered"}, "coerce": true, "format": "csv"}`.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_table_result`
#[no_mangle]
pub unsafe extern "C" fn extract_table(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> TableResultFFI {
    let html: &[u8] = if html_ptr.is_null() || html_len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(html_ptr as *const u8, html_len)
    };

    let request_str = if request_json.is_null() {
        return make_error_result("Request JSON is null");
    } else {
        match CStr::from_ptr(request_json).to_str() {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in request JSON"),
        }
    };

    let request: Request = match serde_json::from_str(request_str) {
        Ok(r) => r,
        Err(e) => return make_error_result(&format!("Failed to parse request JSON: {}", e)),
    };

    match run_request(html, &request) {
        Ok(output) => match CString::new(output) {
            Ok(cstr) => TableResultFFI {
                output_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result contains null bytes"),
        },
        Err(e) => {
            tracing::warn!("table extraction failed: {e}");
            make_error_result(&e.to_string())
        }
    }
}

/// Free a TableResultFFI returned by extract_table
///
/// # Safety
/// - `result` must have been returned by `extract_table`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_table_result(result: TableResultFFI) {
    if !result.output_ptr.is_null() {
        drop(CString::from_raw(result.output_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

/// Install stderr logging with the given filter (null means "info").
/// Returns false when a subscriber was already installed.
///
/// # Safety
/// `filter` must be null or a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn table_parser_init_logging(filter: *const c_char) -> bool {
    let filter = if filter.is_null() {
        "info"
    } else {
        CStr::from_ptr(filter).to_str().unwrap_or("info")
    };
    crate::logging::init(filter)
}

// Helper to create error result
fn make_error_result(msg: &str) -> TableResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    TableResultFFI {
        output_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(result: TableResultFFI) -> (Option<String>, Option<String>) {
        let read = |p: *mut c_char| {
            (!p.is_null()).then(|| CStr::from_ptr(p).to_string_lossy().into_owned())
        };
        let out = (read(result.output_ptr), read(result.error_ptr));
        free_table_result(result);
        out
    }

    #[test]
    fn test_extract_table_csv() {
        let html = r#"<div id="news"><table>
            <tr class="nn is-5"><td>Mar-01</td><td><a href="/c">Headline</a></td></tr>
        </table></div>"#;
        let request = CString::new(r#"{"source": {"kind": "time_ordered"}, "format": "csv"}"#).unwrap();

        let (out, err) = unsafe {
            take(extract_table(html.as_ptr() as *const c_char, html.len(), request.as_ptr()))
        };

        assert!(err.is_none(), "{err:?}");
        assert_eq!(
            out.unwrap(),
            "Date,Title,Link,Source,Category\nMar-01,Headline,/c,CNN,news\n"
        );
    }

    #[test]
    fn test_extract_table_errors() {
        let request = CString::new(r#"{"source": {"kind": "time_ordered"}}"#).unwrap();

        let (out, err) = unsafe { take(extract_table(ptr::null(), 0, request.as_ptr())) };
        assert!(out.is_none());
        assert!(err.unwrap().contains("empty document"));

        let html = "<p>nothing here</p>";
        let (_, err) = unsafe {
            take(extract_table(html.as_ptr() as *const c_char, html.len(), request.as_ptr()))
        };
        assert!(err.unwrap().contains("#news"));

        let bad = CString::new("{not json").unwrap();
        let (_, err) = unsafe {
            take(extract_table(html.as_ptr() as *const c_char, html.len(), bad.as_ptr()))
        };
        assert!(err.unwrap().starts_with("Failed to parse request JSON"));

        let (_, err) = unsafe {
            take(extract_table(html.as_ptr() as *const c_char, html.len(), ptr::null()))
        };
        assert_eq!(err.unwrap(), "Request JSON is null");
    }
}
