use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::manifest::ResolvedImport;
use crate::stack::NetworkStack;

pub const BASE_CFLAGS: [&str; 3] = ["-g", "-Wall", "-O0"];
pub const SECTION_FLAGS: [&str; 2] = ["-fdata-sections", "-ffunction-sections"];

/// Third-party throughput-test tool, compiled unmodified into its test shell.
pub const TTCP_SOURCE: &str = "ttcp/ttcp.c";

/// Append flags, skipping any already present.
pub fn add_flags(flags: &mut Vec<String>, new_flags: &[&str]) {
    for flag in new_flags {
        if !flags.iter().any(|f| f == flag) {
            flags.push((*flag).to_string());
        }
    }
}

/// Per-invocation build settings. Constructed once from the stack selection
/// and passed by reference into each declaration step; nothing mutates it
/// after construction.
#[derive(Debug, Clone, Serialize)]
pub struct BuildProfile {
    pub stack: NetworkStack,
    pub cflags: Vec<String>,
    /// Architecture/BSP library directory under the install prefix,
    /// e.g. `arm-rtems6/xilinx_zynq_a9_qemu/lib`.
    pub arch_lib_path: String,
}

impl BuildProfile {
    pub fn new(stack: NetworkStack, arch_lib_path: &str) -> Self {
        let mut cflags: Vec<String> = BASE_CFLAGS.iter().map(|f| f.to_string()).collect();
        add_flags(&mut cflags, &SECTION_FLAGS);
        BuildProfile {
            stack,
            cflags,
            arch_lib_path: arch_lib_path.to_string(),
        }
    }

    fn lib_install_dest(&self) -> String {
        format!("${{PREFIX}}/{}", self.arch_lib_path)
    }

    fn header_install_dest(&self) -> String {
        format!("${{PREFIX}}/{}/include", self.arch_lib_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Objects,
    StaticLib,
    Program,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum InstallSpec {
    /// Install a single built artifact.
    File { dest: String, artifact: PathBuf },
    /// Install every header found under `root`, preserving subpaths.
    HeaderTree { dest: String, root: PathBuf },
}

/// One node of the build graph, handed to the external build framework as
/// data. netgen never invokes a toolchain itself.
#[derive(Debug, Clone, Serialize)]
pub struct TargetSpec {
    pub name: String,
    pub kind: TargetKind,
    pub sources: Vec<PathBuf>,
    pub includes: Vec<PathBuf>,
    pub defines: Vec<String>,
    pub cflags: Vec<String>,
    pub use_libs: Vec<String>,
    pub install: Vec<InstallSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub stack: NetworkStack,
    pub targets: Vec<TargetSpec>,
}

/// The imported NTP tree: one object collection compiled with the manifest's
/// include paths, archived into libntp.a, with the library and every imported
/// header installed under the prefix.
pub fn ntp_targets(import: &ResolvedImport, profile: &BuildProfile) -> Vec<TargetSpec> {
    let ntp_obj = TargetSpec {
        name: "ntp_obj".to_string(),
        kind: TargetKind::Objects,
        sources: import.sources.clone(),
        includes: import.header_dirs.clone(),
        defines: vec!["HAVE_CONFIG_H=1".to_string()],
        cflags: profile.cflags.clone(),
        use_libs: Vec::new(),
        install: Vec::new(),
    };

    let mut install = vec![InstallSpec::File {
        dest: profile.lib_install_dest(),
        artifact: PathBuf::from("libntp.a"),
    }];
    for dir in &import.header_dirs {
        install.push(InstallSpec::HeaderTree {
            dest: profile.header_install_dest(),
            root: dir.clone(),
        });
    }

    let ntp = TargetSpec {
        name: "ntp".to_string(),
        kind: TargetKind::StaticLib,
        sources: Vec::new(),
        includes: Vec::new(),
        defines: vec!["HAVE_CONFIG_H=1".to_string()],
        cflags: profile.cflags.clone(),
        use_libs: vec!["ntp_obj".to_string()],
        install,
    };

    vec![ntp_obj, ntp]
}

fn test_program(
    name: &str,
    main_source: &str,
    extra_sources: &[&str],
    extra_libs: &[&str],
    profile: &BuildProfile,
    config_include_dir: &Path,
) -> TargetSpec {
    let mut sources = vec![PathBuf::from(main_source)];
    sources.extend(extra_sources.iter().map(PathBuf::from));
    sources.push(PathBuf::from(profile.stack.adapter_source()));

    let mut use_libs: Vec<String> = extra_libs.iter().map(|l| l.to_string()).collect();
    add_flags(
        &mut use_libs,
        profile.stack.stack_libs(),
    );
    add_flags(&mut use_libs, &["rtemstest"]);

    TargetSpec {
        name: name.to_string(),
        kind: TargetKind::Program,
        sources,
        includes: vec![
            config_include_dir.to_path_buf(),
            PathBuf::from(profile.stack.adapter_include_dir()),
        ],
        defines: vec![profile.stack.define().to_string()],
        cflags: profile.cflags.clone(),
        use_libs,
        install: Vec::new(),
    }
}

/// The network-services test executables. Each compiles its testsuite
/// sources plus the selected stack's adapter, sees the generated
/// network-config header, and links the stack libraries plus rtemstest.
pub fn test_targets(profile: &BuildProfile, config_include_dir: &Path) -> Vec<TargetSpec> {
    vec![
        test_program(
            "ntp01",
            "testsuites/ntp01/test_main.c",
            &[],
            &["ntp"],
            profile,
            config_include_dir,
        ),
        test_program(
            "ttcpshell01",
            "testsuites/ttcpshell01/test_main.c",
            &[TTCP_SOURCE],
            &[],
            profile,
            config_include_dir,
        ),
        test_program(
            "telnetd01",
            "testsuites/telnetd01/init.c",
            &[],
            &[],
            profile,
            config_include_dir,
        ),
    ]
}

pub fn build_plan(
    import: &ResolvedImport,
    profile: &BuildProfile,
    config_include_dir: &Path,
) -> BuildPlan {
    let mut targets = ntp_targets(import, profile);
    targets.extend(test_targets(profile, config_include_dir));
    debug!(stack = %profile.stack, targets = targets.len(), "build plan assembled");
    BuildPlan {
        stack: profile.stack,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    fn sample_import() -> ResolvedImport {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "source-files-to-import": ["ntpd/ntpd.c"],
                "header-paths-to-import": ["include"]
            }"#,
        )
        .unwrap();
        manifest.resolve(Path::new("./sebhbsd"))
    }

    #[test]
    fn add_flags_suppresses_duplicates() {
        let mut flags = vec!["-g".to_string(), "-Wall".to_string()];
        add_flags(&mut flags, &["-Wall", "-O0", "-g", "-O0"]);
        assert_eq!(flags, vec!["-g", "-Wall", "-O0"]);
    }

    #[test]
    fn profile_carries_base_and_section_flags_once() {
        let profile = BuildProfile::new(NetworkStack::Lwip, "lib");
        assert_eq!(
            profile.cflags,
            vec!["-g", "-Wall", "-O0", "-fdata-sections", "-ffunction-sections"]
        );
    }

    #[test]
    fn ntp_objects_compile_with_config_header_define() {
        let profile = BuildProfile::new(NetworkStack::Lwip, "lib");
        let targets = ntp_targets(&sample_import(), &profile);
        let ntp_obj = &targets[0];
        assert_eq!(ntp_obj.kind, TargetKind::Objects);
        assert_eq!(ntp_obj.defines, vec!["HAVE_CONFIG_H=1"]);
        assert_eq!(ntp_obj.sources, vec![PathBuf::from("./sebhbsd/ntpd/ntpd.c")]);
    }

    #[test]
    fn ntp_library_installs_archive_and_headers() {
        let profile = BuildProfile::new(NetworkStack::Lwip, "arm-rtems6/zynq/lib");
        let targets = ntp_targets(&sample_import(), &profile);
        let ntp = &targets[1];
        assert_eq!(ntp.kind, TargetKind::StaticLib);
        assert_eq!(ntp.use_libs, vec!["ntp_obj"]);
        match &ntp.install[0] {
            InstallSpec::File { dest, artifact } => {
                assert_eq!(dest, "${PREFIX}/arm-rtems6/zynq/lib");
                assert_eq!(artifact, &PathBuf::from("libntp.a"));
            }
            other => panic!("expected File install, got {other:?}"),
        }
        match &ntp.install[1] {
            InstallSpec::HeaderTree { dest, root } => {
                assert_eq!(dest, "${PREFIX}/arm-rtems6/zynq/lib/include");
                assert_eq!(root, &PathBuf::from("./sebhbsd/include"));
            }
            other => panic!("expected HeaderTree install, got {other:?}"),
        }
    }

    #[test]
    fn test_programs_link_stack_libraries() {
        let profile = BuildProfile::new(NetworkStack::Libbsd, "lib");
        let targets = test_targets(&profile, Path::new("build/include"));
        let ntp01 = &targets[0];
        assert_eq!(ntp01.use_libs, vec!["ntp", "bsd", "m", "rtemstest"]);
        assert!(ntp01
            .sources
            .contains(&PathBuf::from("net/libbsd/net_adapter.c")));
        assert!(ntp01
            .includes
            .contains(&PathBuf::from("build/include")));
    }

    #[test]
    fn ttcp_shell_compiles_imported_ttcp_source() {
        let profile = BuildProfile::new(NetworkStack::Legacy, "lib");
        let targets = test_targets(&profile, Path::new("."));
        let ttcp = targets.iter().find(|t| t.name == "ttcpshell01").unwrap();
        assert!(ttcp.sources.contains(&PathBuf::from(TTCP_SOURCE)));
        assert_eq!(ttcp.use_libs, vec!["networking", "rtemstest"]);
    }

    #[test]
    fn plan_serializes_to_json_for_the_build_framework() {
        let profile = BuildProfile::new(NetworkStack::Lwip, "lib");
        let plan = build_plan(&sample_import(), &profile, Path::new("."));
        assert_eq!(plan.targets.len(), 5);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["stack"], "lwip");
        assert_eq!(json["targets"][1]["kind"], "static-lib");
        assert_eq!(json["targets"][1]["install"][0]["kind"], "file");
    }
}
