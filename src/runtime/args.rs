pub const USAGE: &str = "\
usage: tembang [CATALOG] [--print-config]

  CATALOG          path or http(s) URL of the song list
                   (default: catalog.source, then ./music-list.json)
  --print-config   print the effective settings as TOML and exit
  -h, --help       show this help
";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub catalog: Option<String>,
    pub print_config: bool,
    pub help: bool,
}

impl Args {
    /// Parse the arguments after the program name. The first positional
    /// argument is the catalog; extra positionals are ignored.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut out = Args::default();
        for arg in args {
            match arg.as_str() {
                "--print-config" => out.print_config = true,
                "-h" | "--help" => out.help = true,
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown option: {flag}"));
                }
                _ => {
                    if out.catalog.is_none() {
                        out.catalog = Some(arg);
                    }
                }
            }
        }
        Ok(out)
    }
}
