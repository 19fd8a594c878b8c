#[test]
fn bin() {
    trycmd::TestCases::new()
        .case("tests/bin/*.toml")
        .default_bin_name("coalsfs");
}

#[test]
fn simulate() {
    trycmd::TestCases::new()
        .case("tests/simulate/*.toml")
        .default_bin_name("coalsfs");
}
