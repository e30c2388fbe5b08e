use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Csv,
    IssuesCsv,
    Html,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CliCommand {
    Scan {
        hubs_file: String,
        snapshot: Option<String>,
    },
    List {
        snapshot: Option<String>,
    },
    Mesh {
        snapshot: Option<String>,
    },
    Issues {
        notify: bool,
        snapshot: Option<String>,
    },
    Export {
        format: ExportFormat,
        output: Option<String>,
        snapshot: Option<String>,
    },
    Help,
    Version,
}

pub(crate) fn version_text() -> String {
    format!("hubaudit {}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn usage_text() -> String {
    format!(
        "{version}
Cross-hub device inventory auditor

Usage:
  hubaudit scan --hubs <FILE> [--snapshot <FILE>]
  hubaudit [list] [--snapshot <FILE>]
  hubaudit mesh [--snapshot <FILE>]
  hubaudit issues [--notify] [--snapshot <FILE>]
  hubaudit export --format <csv|issues-csv|html> [--output <FILE>] [--snapshot <FILE>]
  hubaudit --help
  hubaudit --version

Options:
      --hubs <FILE>      Newline-delimited hub address list ('#' comments)
      --snapshot <FILE>  Snapshot document path (default: platform config dir)
      --notify           Fire configured webhooks for triggered categories
      --format <FMT>     Export format: csv (devices), issues-csv or html
  -o, --output <FILE>    Export output path (default: config, else stdout)
  -h, --help             Show this help text
  -V, --version          Show version",
        version = version_text()
    )
}

fn parse_format(raw: &str) -> Result<ExportFormat> {
    match raw {
        "csv" => Ok(ExportFormat::Csv),
        "issues-csv" => Ok(ExportFormat::IssuesCsv),
        "html" => Ok(ExportFormat::Html),
        _ => Err(anyhow::anyhow!(
            "Invalid value for --format: '{}'. Expected csv, issues-csv or html.\n\n{}",
            raw,
            usage_text()
        )),
    }
}

pub(crate) fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut hubs_file: Option<String> = None;
    let mut snapshot: Option<String> = None;
    let mut output: Option<String> = None;
    let mut format: Option<ExportFormat> = None;
    let mut notify = false;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "scan" | "list" | "mesh" | "issues" | "export" => {
                if command.as_deref().is_some_and(|existing| existing != arg) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(arg.to_string());
            }
            "--hubs" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --hubs.\n\n{}", usage_text())
                })?;
                hubs_file = Some(value.as_ref().to_string());
            }
            "--snapshot" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --snapshot.\n\n{}", usage_text())
                })?;
                snapshot = Some(value.as_ref().to_string());
            }
            "-o" | "--output" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --output.\n\n{}", usage_text())
                })?;
                output = Some(value.as_ref().to_string());
            }
            "--format" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --format.\n\n{}", usage_text())
                })?;
                format = Some(parse_format(value.as_ref())?);
            }
            "--notify" => {
                notify = true;
            }
            _ if arg.starts_with("--hubs=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --hubs.\n\n{}",
                        usage_text()
                    ));
                }
                hubs_file = Some(value.to_string());
            }
            _ if arg.starts_with("--snapshot=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --snapshot.\n\n{}",
                        usage_text()
                    ));
                }
                snapshot = Some(value.to_string());
            }
            _ if arg.starts_with("--format=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                format = Some(parse_format(value)?);
            }
            _ if arg.starts_with("--output=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --output.\n\n{}",
                        usage_text()
                    ));
                }
                output = Some(value.to_string());
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
        }
    }

    match command.as_deref().unwrap_or("list") {
        "scan" => {
            if notify || format.is_some() || output.is_some() {
                return Err(anyhow::anyhow!(
                    "--notify/--format/--output are not valid with scan.\n\n{}",
                    usage_text()
                ));
            }
            let hubs_file = hubs_file.ok_or_else(|| {
                anyhow::anyhow!("scan requires --hubs <FILE>.\n\n{}", usage_text())
            })?;
            Ok(CliCommand::Scan {
                hubs_file,
                snapshot,
            })
        }
        "list" => {
            if notify || format.is_some() || output.is_some() || hubs_file.is_some() {
                return Err(anyhow::anyhow!(
                    "--hubs/--notify/--format/--output are not valid with list.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::List { snapshot })
        }
        "mesh" => {
            if notify || format.is_some() || output.is_some() || hubs_file.is_some() {
                return Err(anyhow::anyhow!(
                    "--hubs/--notify/--format/--output are not valid with mesh.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::Mesh { snapshot })
        }
        "issues" => {
            if format.is_some() || output.is_some() || hubs_file.is_some() {
                return Err(anyhow::anyhow!(
                    "--hubs/--format/--output are not valid with issues.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::Issues { notify, snapshot })
        }
        "export" => {
            if notify || hubs_file.is_some() {
                return Err(anyhow::anyhow!(
                    "--hubs/--notify are not valid with export.\n\n{}",
                    usage_text()
                ));
            }
            let format = format.ok_or_else(|| {
                anyhow::anyhow!(
                    "export requires --format <csv|issues-csv|html>.\n\n{}",
                    usage_text()
                )
            })?;
            Ok(CliCommand::Export {
                format,
                output,
                snapshot,
            })
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_help_flag() {
        let args = ["hubaudit", "--help"];
        let parsed = parse_cli_args(args).expect("help args should parse");
        assert_eq!(parsed, CliCommand::Help);
    }

    #[test]
    fn parse_version_flag() {
        let args = ["hubaudit", "--version"];
        let parsed = parse_cli_args(args).expect("version args should parse");
        assert_eq!(parsed, CliCommand::Version);
    }

    #[test]
    fn parse_default_list_command() {
        let args = ["hubaudit"];
        let parsed = parse_cli_args(args).expect("default args should parse");
        assert_eq!(parsed, CliCommand::List { snapshot: None });
    }

    #[test]
    fn parse_scan_with_hubs_file() {
        let args = ["hubaudit", "scan", "--hubs", "hubs.txt"];
        let parsed = parse_cli_args(args).expect("scan should parse");
        assert_eq!(
            parsed,
            CliCommand::Scan {
                hubs_file: "hubs.txt".to_string(),
                snapshot: None
            }
        );
    }

    #[test]
    fn parse_scan_requires_hubs_file() {
        let args = ["hubaudit", "scan"];
        let err = parse_cli_args(args).expect_err("scan without --hubs should fail");
        assert!(err.to_string().contains("scan requires --hubs"));
    }

    #[test]
    fn parse_scan_with_equals_form_and_snapshot() {
        let args = ["hubaudit", "scan", "--hubs=hubs.txt", "--snapshot=/tmp/s.json"];
        let parsed = parse_cli_args(args).expect("scan should parse");
        assert_eq!(
            parsed,
            CliCommand::Scan {
                hubs_file: "hubs.txt".to_string(),
                snapshot: Some("/tmp/s.json".to_string())
            }
        );
    }

    #[test]
    fn parse_issues_with_notify() {
        let args = ["hubaudit", "issues", "--notify"];
        let parsed = parse_cli_args(args).expect("issues should parse");
        assert_eq!(
            parsed,
            CliCommand::Issues {
                notify: true,
                snapshot: None
            }
        );
    }

    #[test]
    fn parse_export_with_format_and_output() {
        let args = ["hubaudit", "export", "--format", "csv", "-o", "out.csv"];
        let parsed = parse_cli_args(args).expect("export should parse");
        assert_eq!(
            parsed,
            CliCommand::Export {
                format: ExportFormat::Csv,
                output: Some("out.csv".to_string()),
                snapshot: None
            }
        );
    }

    #[test]
    fn parse_export_issues_csv_format() {
        let args = ["hubaudit", "export", "--format=issues-csv"];
        let parsed = parse_cli_args(args).expect("export should parse");
        assert_eq!(
            parsed,
            CliCommand::Export {
                format: ExportFormat::IssuesCsv,
                output: None,
                snapshot: None
            }
        );
    }

    #[test]
    fn parse_export_requires_format() {
        let args = ["hubaudit", "export"];
        let err = parse_cli_args(args).expect_err("export without --format should fail");
        assert!(err.to_string().contains("export requires --format"));
    }

    #[test]
    fn parse_export_rejects_bad_format() {
        let args = ["hubaudit", "export", "--format", "pdf"];
        let err = parse_cli_args(args).expect_err("bad format should fail");
        assert!(err.to_string().contains("Invalid value for --format"));
    }

    #[test]
    fn parse_list_rejects_scan_flags() {
        let args = ["hubaudit", "list", "--hubs", "hubs.txt"];
        let err = parse_cli_args(args).expect_err("list should reject --hubs");
        assert!(err.to_string().contains("not valid with list"));
    }

    #[test]
    fn parse_unknown_argument_errors() {
        let args = ["hubaudit", "--unknown"];
        let err = parse_cli_args(args).expect_err("unknown flag should fail");
        assert!(err.to_string().contains("Unknown argument"));
    }

    #[test]
    fn parse_multiple_commands_errors() {
        let args = ["hubaudit", "scan", "list"];
        let err = parse_cli_args(args).expect_err("two commands should fail");
        assert!(err.to_string().contains("Multiple commands"));
    }
}
