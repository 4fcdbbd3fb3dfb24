// Compiles a literal pattern once and hands out the cached `&'static Regex`.
macro_rules! regex(
    ($s:expr) => ({
        static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
        RE.get_or_init(|| ::regex::Regex::new($s).unwrap())
    });
);
