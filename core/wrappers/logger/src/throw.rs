extern crate tracing;

// Log an error, then panic with the same message.
#[macro_export]
macro_rules! throw {
    ($($arg:tt)*) => ({
        $crate::error!($($arg)*);
        panic!($($arg)*);
    })
}
