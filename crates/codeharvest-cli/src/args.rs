use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    /// Use `output_dir` from the config file.
    ConfigDir,
    Dir(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub input: Input,
    pub json: bool,
    pub export: Option<Export>,
    pub config: Option<PathBuf>,
}

impl Args {
    /// True when neither `--json` nor `--export` was given.
    pub fn interactive(&self) -> bool {
        !self.json && self.export.is_none()
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--json] [--export [<dir>]] [--config <file>] <response-file | ->\n\
         \n\
         Without --json or --export the project is opened in an interactive browser.\n\
         A bare --export writes to output_dir from the config file."
    )
}

/// Parse arguments, excluding the program name.
///
/// The last positional argument is always the input, so `--export` only takes
/// a directory when another argument follows it.
pub fn parse(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut json = false;
    let mut export = None;
    let mut config = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--json" => json = true,
            "--export" => {
                let next = args.get(i + 1);
                let has_value = next.is_some_and(|n| !n.starts_with("--")) && i + 2 < args.len();
                export = Some(match next {
                    Some(dir) if has_value => {
                        i += 1;
                        Export::Dir(PathBuf::from(dir))
                    }
                    _ => Export::ConfigDir,
                });
            }
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    return Err("--config needs a file path".to_string());
                };
                config = Some(PathBuf::from(path));
                i += 1;
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option {flag}")),
            path => {
                if input.is_some() {
                    return Err(format!("Unexpected argument {path}"));
                }
                input = Some(if path == "-" {
                    Input::Stdin
                } else {
                    Input::File(PathBuf::from(path))
                });
            }
        }
        i += 1;
    }

    let input = input.ok_or_else(|| "No response file given".to_string())?;
    Ok(Args {
        input,
        json,
        export,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse_str(args: &[&str]) -> Result<Args, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse(&args)
    }

    #[test]
    fn file_only_is_interactive() {
        let args = parse_str(&["reply.txt"]).unwrap();
        assert_eq!(args.input, Input::File(PathBuf::from("reply.txt")));
        assert!(args.interactive());
    }

    #[test]
    fn dash_reads_stdin() {
        let args = parse_str(&["--json", "-"]).unwrap();
        assert_eq!(args.input, Input::Stdin);
        assert!(args.json);
        assert!(!args.interactive());
    }

    #[rstest]
    #[case(&["--export", "out", "reply.txt"], Some(Export::Dir(PathBuf::from("out"))))]
    #[case(&["--export", "reply.txt"], Some(Export::ConfigDir))]
    #[case(&["reply.txt", "--export"], Some(Export::ConfigDir))]
    #[case(&["--export", "--json", "reply.txt"], Some(Export::ConfigDir))]
    #[case(&["reply.txt"], None)]
    fn export_forms(#[case] args: &[&str], #[case] expected: Option<Export>) {
        assert_eq!(parse_str(args).unwrap().export, expected);
    }

    #[test]
    fn config_takes_a_value() {
        let args = parse_str(&["--config", "alt.toml", "reply.txt"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("alt.toml")));
        assert!(parse_str(&["reply.txt", "--config"]).is_err());
    }

    #[rstest]
    #[case(&[])]
    #[case(&["--json"])]
    #[case(&["a.txt", "b.txt"])]
    #[case(&["--verbose", "a.txt"])]
    fn bad_arguments(#[case] args: &[&str]) {
        assert!(parse_str(args).is_err());
    }
}
