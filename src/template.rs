use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::ConfigSet;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("header template not found: {path}")]
    NotFound { path: String },

    #[error("failed to read header template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write generated header {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Replace every `@TAG@` placeholder whose tag is present in the config.
///
/// Single left-to-right scan: substituted values are never rescanned, so the
/// result is independent of tag order and cannot recurse. Placeholders for
/// tags absent from the config stay in the output verbatim.
pub fn substitute(template: &str, cfg: &ConfigSet) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('@') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('@') {
            Some(end) => {
                let tag = &after[..end];
                if let Some(value) = cfg.get(tag) {
                    out.push_str(value);
                    rest = &after[end + 1..];
                } else {
                    // Not a recognized placeholder. Emit the `@` and resume
                    // scanning right after it; the closing `@` may open the
                    // next placeholder.
                    out.push('@');
                    rest = after;
                }
            }
            None => {
                out.push('@');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render the template against the config and write the generated header.
///
/// The output is rendered fully in memory and written in one step, so a
/// failure on any path leaves no partial header behind.
pub fn generate(
    template_path: &Path,
    output_path: &Path,
    cfg: &ConfigSet,
) -> Result<(), TemplateError> {
    if !template_path.exists() {
        return Err(TemplateError::NotFound {
            path: template_path.display().to_string(),
        });
    }
    let template = fs::read_to_string(template_path).map_err(|source| TemplateError::Read {
        path: template_path.display().to_string(),
        source,
    })?;
    let rendered = substitute(&template, cfg);
    fs::write(output_path, rendered).map_err(|source| TemplateError::Write {
        path: output_path.display().to_string(),
        source,
    })?;
    debug!(
        template = %template_path.display(),
        output = %output_path.display(),
        "header generated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn sample_config() -> ConfigSet {
        config::parse("NET_CFG_IFACE=eth0\nNET_CFG_BOOT_PROT=dhcp\n").unwrap()
    }

    #[test]
    fn substitutes_supplied_tags() {
        let out = substitute(
            "#define NET_CFG_IFACE \"@NET_CFG_IFACE@\"\n\
             #define NET_CFG_BOOT_PROT \"@NET_CFG_BOOT_PROT@\"\n",
            &sample_config(),
        );
        assert!(out.contains("#define NET_CFG_IFACE \"eth0\""));
        assert!(out.contains("#define NET_CFG_BOOT_PROT \"dhcp\""));
    }

    #[test]
    fn leaves_unsupplied_placeholders_literal() {
        let out = substitute(
            "iface @NET_CFG_IFACE@ self @NET_CFG_SELF_IP@",
            &sample_config(),
        );
        assert_eq!(out, "iface eth0 self @NET_CFG_SELF_IP@");
    }

    #[test]
    fn repeated_placeholders_all_replaced() {
        let out = substitute("@NET_CFG_IFACE@/@NET_CFG_IFACE@", &sample_config());
        assert_eq!(out, "eth0/eth0");
    }

    #[test]
    fn substitution_does_not_recurse_into_values() {
        let cfg = config::parse(
            "NET_CFG_IFACE=@NET_CFG_BOOT_PROT@\nNET_CFG_BOOT_PROT=dhcp\n",
        )
        .unwrap();
        let out = substitute("@NET_CFG_IFACE@", &cfg);
        assert_eq!(out, "@NET_CFG_BOOT_PROT@");
    }

    #[test]
    fn stray_at_signs_pass_through() {
        let out = substitute("user@host and @NET_CFG_IFACE@", &sample_config());
        assert_eq!(out, "user@host and eth0");
    }

    #[test]
    fn generate_writes_rendered_header() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("network-config.h.in");
        let output = dir.path().join("network-config.h");
        std::fs::write(&template, "#define NET_CFG_IFACE \"@NET_CFG_IFACE@\"\n").unwrap();

        generate(&template, &output, &sample_config()).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "#define NET_CFG_IFACE \"eth0\"\n");
    }

    #[test]
    fn generate_is_byte_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("network-config.h.in");
        let output = dir.path().join("network-config.h");
        std::fs::write(
            &template,
            "iface=@NET_CFG_IFACE@ ntp=@NET_CFG_NTP_IP@\n",
        )
        .unwrap();

        let cfg = sample_config();
        generate(&template, &output, &cfg).unwrap();
        let first = std::fs::read(&output).unwrap();
        generate(&template, &output, &cfg).unwrap();
        let second = std::fs::read(&output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn generate_missing_template_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("no-such-template");
        let output = dir.path().join("network-config.h");

        let err = generate(&template, &output, &sample_config()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
        assert!(!output.exists());
    }
}
