//! Hand-rolled argument parsing for the tracker console.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub base_url: String,
    pub customer: String,
    pub file: String,
    pub server_name: Option<String>,
    pub uploaded_by: Option<String>,
}

pub const USAGE: &str =
    "usage: tracker_app <base-url> <customer> <file> [--server-name NAME] [--uploaded-by USER]";

pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut server_name = None;
    let mut uploaded_by = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--server-name" => {
                server_name = Some(iter.next().ok_or("--server-name needs a value")?);
            }
            "--uploaded-by" => {
                uploaded_by = Some(iter.next().ok_or("--uploaded-by needs a value")?);
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown flag {other}"));
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() != 3 {
        return Err(USAGE.to_string());
    }
    let mut positional = positional.into_iter();
    Ok(CliArgs {
        base_url: positional.next().unwrap_or_default(),
        customer: positional.next().unwrap_or_default(),
        file: positional.next().unwrap_or_default(),
        server_name,
        uploaded_by,
    })
}
