use std::io;
use std::os::unix::io::AsRawFd;

use nix::unistd;

/// Log the error of a `Result` that is otherwise ignored.
macro_rules! log_if_err {
    ($result:expr, $fmt:expr) => {{
        if let Err(ref e) = $result {
            log::error!("{}: {}", $fmt, e);
        }
    }};
    ($result:expr, $fmt:expr, $($arg:tt)+) => {{
        if let Err(ref e) = $result {
            log::error!("{}: {}", format_args!($fmt, $($arg)+), e);
        }
    }};
}

/// Is the shell's standard input attached to a terminal?
pub fn isatty() -> bool {
    let temp_result = unistd::isatty(io::stdin().as_raw_fd());
    log_if_err!(temp_result, "unistd::isatty");
    temp_result.unwrap_or(false)
}

/// Exit statuses outside of `0..=255` wrap the way `exit(3)` truncates them.
pub fn exit_code_like_u8(code: i32) -> i32 {
    code.rem_euclid(256)
}
