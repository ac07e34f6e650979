pub const APP_NAME: &str = "gomatrix";

/// Config file picked up from the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "gomatrix.toml";

pub const DEFAULT_PACKAGE: &str = "example.com/monorepo";
pub const DEFAULT_OUTPUT_DIR: &str = "_output/local";
pub const DEFAULT_MIN_GO_VERSION: &str = "1.4";

/// Toolchain workspace directory under the output base (`<output>/go`).
pub const GOPATH_SUBDIR: &str = "go";
/// Vendored dependency workspace relative to the source root.
pub const GODEPS_WORKSPACE: &str = "Godeps/_workspace";
/// Install suffix keeping static and dynamic package archives apart.
pub const STATIC_INSTALL_SUFFIX: &str = "cgo";

pub const GO_INSTALL_DOCS: &str = "https://golang.org/doc/install";

pub const ENV_GOOS: &str = "GOMATRIX_GOOS";
pub const ENV_GOARCH: &str = "GOMATRIX_GOARCH";
pub const ENV_EXTRA_GOPATH: &str = "GOMATRIX_EXTRA_GOPATH";
pub const ENV_NO_GODEPS: &str = "GOMATRIX_NO_GODEPS";
pub const ENV_BUILD_PLATFORMS: &str = "GOMATRIX_BUILD_PLATFORMS";
pub const ENV_GOFLAGS: &str = "GOMATRIX_GOFLAGS";
pub const ENV_GO: &str = "GOMATRIX_GO";
pub const ENV_OUTPUT: &str = "GOMATRIX_OUTPUT";
pub const ENV_GIT_VERSION: &str = "GOMATRIX_GIT_VERSION";
pub const ENV_GIT_COMMIT: &str = "GOMATRIX_GIT_COMMIT";
pub const ENV_GIT_TREE_STATE: &str = "GOMATRIX_GIT_TREE_STATE";

/// Any of these being non-empty marks a pre-validated CI environment.
pub const CI_MARKERS: &[&str] = &["CI", "TRAVIS"];
