/// declares a `Context` trait for the given error type so a crate can attach
/// a message to a failing `Result` or empty `Option`
#[macro_export]
macro_rules! context_trait {
    ($e:path) => {
        pub trait Context<T, E> {
            fn context<C>(self, cxt: C) -> std::result::Result<T, $e>
            where
                C: Into<String>;
        }
    };
}

/// implements `From<$src>` for an error type that exposes
/// `new()` and `source()` builders
#[macro_export]
macro_rules! source_from {
    ($e:path, $($src:path),+ $(,)?) => {
        $(
            impl From<$src> for $e {
                fn from(err: $src) -> Self {
                    <$e>::new().source(err)
                }
            }
        )+
    };
}
