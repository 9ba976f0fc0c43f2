//! Call-site capture for Error and Warning messages.

/// Source location of a logging call.
///
/// Built by [`call_site!`](crate::call_site!) where the macro expands, so
/// the reported location is the caller's, not the logger's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl CallSite {
    /// Placeholder for levels that do not log their call site.
    pub const EMPTY: Self = Self {
        file: "",
        line: 0,
        function: "",
    };
}

/// Capture the current file, line and enclosing function name.
///
/// The function name comes from the type name of a local item, which the
/// compiler qualifies with the full path of the enclosing function.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __here() {}
        fn __name_of<T>(_: T) -> &'static str {
            core::any::type_name::<T>()
        }
        let name = __name_of(__here);
        $crate::CallSite {
            file: core::file!(),
            line: core::line!(),
            function: name.strip_suffix("::__here").unwrap_or(name),
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_reports_this_file() {
        let site = crate::call_site!();
        assert!(site.file.ends_with("call_site.rs"));
        assert!(site.line > 0);
        assert!(site.function.ends_with("test_capture_reports_this_file"));
    }

    #[test]
    fn test_capture_strips_macro_internals() {
        let site = crate::call_site!();
        assert!(!site.function.contains("__here"));
    }

    #[test]
    fn test_empty_is_blank() {
        assert_eq!(CallSite::EMPTY.file, "");
        assert_eq!(CallSite::EMPTY.line, 0);
        assert_eq!(CallSite::EMPTY.function, "");
    }
}
