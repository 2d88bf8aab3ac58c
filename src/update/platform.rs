use std::env::consts;

/// Release asset suffix for the running system, such as `linux-x86_64`
pub fn detect_platform() -> Option<String> {
    platform_for(consts::OS, consts::ARCH)
}

/// Only the targets releases are published for are recognised
pub fn platform_for(os: &str, arch: &str) -> Option<String> {
    let os = match os {
        "linux" => "linux",
        "macos" => "darwin",
        _ => return None,
    };
    let arch = match arch {
        "x86_64" => "x86_64",
        "aarch64" => "arm64",
        _ => return None,
    };

    Some(format!("{os}-{arch}"))
}

/// Name of the release asset holding the executable for `platform`
pub fn asset_name(platform: &str) -> String {
    format!("picogem-{platform}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("linux", "x86_64", Some("linux-x86_64"))]
    #[case("linux", "aarch64", Some("linux-arm64"))]
    #[case("macos", "x86_64", Some("darwin-x86_64"))]
    #[case("macos", "aarch64", Some("darwin-arm64"))]
    #[case("windows", "x86_64", None)]
    #[case("linux", "riscv64", None)]
    fn test_platform_for(#[case] os: &str, #[case] arch: &str, #[case] expected: Option<&str>) {
        assert_eq!(platform_for(os, arch).as_deref(), expected);
    }

    #[test]
    fn test_asset_name() {
        assert_eq!(asset_name("darwin-arm64"), "picogem-darwin-arm64");
    }
}
