use std::os::raw::c_int;

/// Engine thread identifiers.
pub type cef_thread_id_t = c_int;

pub const TID_UI: cef_thread_id_t = 0;
pub const TID_FILE_BACKGROUND: cef_thread_id_t = 1;
pub const TID_FILE_USER_VISIBLE: cef_thread_id_t = 2;
pub const TID_FILE_USER_BLOCKING: cef_thread_id_t = 3;
pub const TID_PROCESS_LAUNCHER: cef_thread_id_t = 4;
pub const TID_IO: cef_thread_id_t = 5;
pub const TID_RENDERER: cef_thread_id_t = 6;

/// Value type tags.
pub type cef_value_type_t = c_int;

pub const VTYPE_INVALID: cef_value_type_t = 0;
pub const VTYPE_NULL: cef_value_type_t = 1;
pub const VTYPE_BOOL: cef_value_type_t = 2;
pub const VTYPE_INT: cef_value_type_t = 3;
pub const VTYPE_DOUBLE: cef_value_type_t = 4;
pub const VTYPE_STRING: cef_value_type_t = 5;
pub const VTYPE_BINARY: cef_value_type_t = 6;
pub const VTYPE_DICTIONARY: cef_value_type_t = 7;
pub const VTYPE_LIST: cef_value_type_t = 8;

/// Network error codes (subset).
pub type cef_errorcode_t = c_int;

pub const ERR_NONE: cef_errorcode_t = 0;
pub const ERR_FAILED: cef_errorcode_t = -2;
pub const ERR_ABORTED: cef_errorcode_t = -3;
pub const ERR_INVALID_ARGUMENT: cef_errorcode_t = -4;
pub const ERR_NAME_NOT_RESOLVED: cef_errorcode_t = -105;

/// `whence` values for stream seeking.
pub const SEEK_SET: c_int = 0;
pub const SEEK_CUR: c_int = 1;
pub const SEEK_END: c_int = 2;
