// backupify CLI Arguments
// author: kodeholic
//
// 순수 파싱만 담당 (IO 없음, 테스트 용이)
//
// Usage: backupify-sftp [CONFIG]

use backupify_core::config::DEFAULT_CONFIG_FILE;

#[derive(Debug, PartialEq)]
pub enum Command {
    Run { config_path: String },
    Help,
    Version,
    Invalid(String),
}

impl Command {
    /// argv[0] 을 제외한 인자 목록을 파싱
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let mut config_path: Option<String> = None;

        for arg in args.iter().map(|a| a.as_ref()) {
            match arg {
                "-h" | "--help"    => return Command::Help,
                "-V" | "--version" => return Command::Version,
                flag if flag.starts_with('-') && flag != "-" => {
                    return Command::Invalid(format!("Unknown option: {}", flag));
                }
                path => {
                    if config_path.is_some() {
                        return Command::Invalid(format!("Unexpected argument: {}", path));
                    }
                    config_path = Some(path.to_string());
                }
            }
        }

        Command::Run {
            config_path: config_path.unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
        }
    }
}
