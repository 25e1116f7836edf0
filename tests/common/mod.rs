/// Do snapshot testing for a rendered configuration error
#[macro_export]
macro_rules! assert_diag_snapshot {
    ($err:expr) => {
        insta::assert_snapshot!(strip_ansi_escapes::strip_str(&$err.render_pretty()))
    };
    ($err:expr, @$snapshot:literal) => {
        insta::assert_snapshot!(strip_ansi_escapes::strip_str(&$err.render_pretty()), @$snapshot)
    };
}

/// Do snapshot testing for help text (strips ANSI codes)
#[macro_export]
macro_rules! assert_help_snapshot {
    ($help:expr) => {
        insta::assert_snapshot!(strip_ansi_escapes::strip_str(&$help))
    };
    ($help:expr, @$snapshot:literal) => {
        insta::assert_snapshot!(strip_ansi_escapes::strip_str(&$help), @$snapshot)
    };
}
