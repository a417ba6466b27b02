use crate::error::FilterError;
use crate::processing::stream_filter::StreamFilter;

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};

pub const STATUS_OK: c_int = 0;
pub const STATUS_NULL_POINTER: c_int = -1;
pub const STATUS_INVALID_MODE: c_int = -2;
pub const STATUS_INVALID_SPEC: c_int = -3;
pub const STATUS_NON_FINITE: c_int = -4;
pub const STATUS_ERROR: c_int = -5;

fn status(error: &FilterError) -> c_int {
    match error {
        FilterError::InvalidMode(_) => STATUS_INVALID_MODE,
        FilterError::InvalidFilterSpec(_) => STATUS_INVALID_SPEC,
        FilterError::NonFiniteSample(_) => STATUS_NON_FINITE,
        _ => STATUS_ERROR,
    }
}

unsafe fn filter_mut<'a>(filter_ptr: *mut c_void) -> Option<&'a mut StreamFilter> {
    (filter_ptr as *mut StreamFilter).as_mut()
}

#[no_mangle]
pub extern "C" fn create_stream_filter(sample_rate: f64) -> *mut c_void {
    let boxed_filter = Box::new(StreamFilter::new(sample_rate));
    Box::into_raw(boxed_filter) as *mut c_void
}

#[no_mangle]
pub extern "C" fn delete_stream_filter(filter_ptr: *mut c_void) {
    if !filter_ptr.is_null() {
        unsafe {
            drop(Box::from_raw(filter_ptr as *mut StreamFilter));
        }
    }
}

/// `mode` must be a NUL-terminated string such as `"eeg"` or `"notch50"`.
#[no_mangle]
pub extern "C" fn stream_filter_set_mode(filter_ptr: *mut c_void, mode: *const c_char) -> c_int {
    let Some(filter) = (unsafe { filter_mut(filter_ptr) }) else {
        return STATUS_NULL_POINTER;
    };
    if mode.is_null() {
        return STATUS_NULL_POINTER;
    }
    let Ok(mode_str) = unsafe { CStr::from_ptr(mode) }.to_str() else {
        return STATUS_INVALID_MODE;
    };

    match filter.set_mode_str(mode_str) {
        Ok(()) => STATUS_OK,
        Err(e) => status(&e),
    }
}

#[no_mangle]
pub extern "C" fn stream_filter_process(filter_ptr: *mut c_void, sample: f64, output: *mut f64) -> c_int {
    let Some(filter) = (unsafe { filter_mut(filter_ptr) }) else {
        return STATUS_NULL_POINTER;
    };
    if output.is_null() {
        return STATUS_NULL_POINTER;
    }

    match filter.process(sample) {
        Ok(filtered_sample) => {
            unsafe { *output = filtered_sample };
            STATUS_OK
        }
        Err(e) => status(&e),
    }
}

/// Filters `length` samples from `data` into `output`. Stops at the first
/// failing sample; earlier outputs are already written.
#[no_mangle]
pub extern "C" fn stream_filter_process_chunk(
    filter_ptr: *mut c_void,
    data: *const f64,
    output: *mut f64,
    length: usize,
) -> c_int {
    let Some(filter) = (unsafe { filter_mut(filter_ptr) }) else {
        return STATUS_NULL_POINTER;
    };
    if length == 0 {
        return STATUS_OK;
    }
    if data.is_null() || output.is_null() {
        return STATUS_NULL_POINTER;
    }

    let data_slice = unsafe { std::slice::from_raw_parts(data, length) };
    let output_slice = unsafe { std::slice::from_raw_parts_mut(output, length) };
    for (&sample, out) in data_slice.iter().zip(output_slice.iter_mut()) {
        match filter.process(sample) {
            Ok(filtered_sample) => *out = filtered_sample,
            Err(e) => return status(&e),
        }
    }
    STATUS_OK
}

#[no_mangle]
pub extern "C" fn stream_filter_reset(filter_ptr: *mut c_void) -> c_int {
    match unsafe { filter_mut(filter_ptr) } {
        Some(filter) => {
            filter.reset();
            STATUS_OK
        }
        None => STATUS_NULL_POINTER,
    }
}
