#[derive(Debug, Clone)]
pub struct ProcessCommand {
    command: String,
    args: Vec<String>,
}

pub enum SpawnCommandResult {
    CommandNotFound { command_name: String },
    Spawned(std::io::Result<std::process::Child>),
}

impl ProcessCommand {
    pub fn new(command: &str, args: &[&str]) -> Self {
        Self {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Spawns the command with output streams piped, distinguishing a missing
    /// executable from other spawn failures so that callers can point the
    /// user at their configuration instead of showing a raw OS error.
    pub fn spawn(&self) -> SpawnCommandResult {
        log::info!("ProcessCommand::spawn {:?} {:?}", self.command, self.args);
        if which::which(&self.command).is_err() {
            log::info!("ProcessCommand::spawn: Failed to locate {:?}", self.command);
            return SpawnCommandResult::CommandNotFound {
                command_name: self.command.clone(),
            };
        }
        SpawnCommandResult::Spawned(
            std::process::Command::new(&self.command)
                .args(&self.args)
                .stdin(std::process::Stdio::null())
                .stdout(std::process::Stdio::piped())
                .stderr(std::process::Stdio::piped())
                .spawn(),
        )
    }
}
