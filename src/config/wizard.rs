fn loose_matches(str: &str, one_of: &[&str]) -> bool {
    for check in one_of {
        if str.eq_ignore_ascii_case(check) {
            return true
        }
    }
    false
}

pub fn str_to_boolish(str: &str) -> Option<bool>  {
    let str = str.trim();
    if loose_matches(str, &["y", "yes", "true", "s", "si", "sí"]) { return Some(true) }
    if loose_matches(str, &["n", "no", "false"]) { return Some(false) }
    None
}

pub mod io {
    use std::io::{BufRead, Write};

    use super::*;

    fn write_prompt(prompt: &str, suffix: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(prompt.as_bytes());
        let _ = stdout.write_all(suffix.as_bytes());
        let _ = stdout.flush();
    }

    /// Read one line from standard input, without the trailing newline. `None` on end of input.
    fn read_answer() -> Option<String> {
        let mut answer = String::with_capacity(16);
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(0) => None,
            Ok(_) => Some(answer.trim_end_matches(['\r', '\n']).to_owned()),
            Err(error) => {
                tracing::error!(?error, "could not process user input");
                None
            }
        }
    }

    /// Prompt for a value, keeping `default` when the answer is blank.
    pub fn prompt_with_default(prompt: &str, default: &str) -> String {
        write_prompt(prompt, &format!(" [{default}]\n=> "));
        match read_answer() {
            Some(answer) if !answer.trim().is_empty() => answer.trim().to_owned(),
            _ => default.to_owned()
        }
    }

    /// Ask a yes/no question until it gets an answer. End of input counts as "no".
    pub fn prompt_bool(prompt: &str) -> bool {
        loop {
            write_prompt(prompt, " (y/n)\n=> ");
            let Some(answer) = read_answer() else { return false };
            if let Some(bool) = str_to_boolish(&answer) { return bool };
            println!(r#"Invalid input! Enter "yes" or "no"."#);
            println!()
        }
    }
}
