fn main() {
    // Only the espidf hardware build needs the ESP-IDF build environment;
    // host builds (tests, fuzzing) skip it.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
