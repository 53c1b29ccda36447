//! Parsing of shell input lines.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(Option<String>),
    New(Option<String>),
    Save(Option<String>),
    Goto(Option<String>),
    Back,
    Pwd,
    List,
    Read(Option<String>),
    Find(Option<String>),
    Add,
    Edit(Option<String>),
    Del(Option<String>),
    Enc(Option<String>),
    Dec(Option<String>),
    Help,
    Exit,
    Unknown(String),
}

impl Command {
    /// `None` for blank input. The verb is case-insensitive; only the first
    /// argument is used.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?.to_lowercase();
        let arg = parts.next().map(String::from);
        let cmd = match verb.as_str() {
            "exit" | "quit" | "q" => Self::Exit,
            "help" => Self::Help,
            "open" => Self::Open(arg),
            "new" => Self::New(arg),
            "save" => Self::Save(arg),
            "goto" | "cd" => Self::Goto(arg),
            "back" | ".." => Self::Back,
            "pwd" => Self::Pwd,
            "list" | "ls" => Self::List,
            "read" => Self::Read(arg),
            "find" => Self::Find(arg),
            "add" => Self::Add,
            "edit" => Self::Edit(arg),
            "del" => Self::Del(arg),
            "enc" => Self::Enc(arg),
            "dec" => Self::Dec(arg),
            _ => Self::Unknown(verb),
        };
        Some(cmd)
    }
}
