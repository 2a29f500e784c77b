use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::debug;

use scopesrt::{Error, Result};

fn read_answer(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Ask for the folder holding the channel images
pub fn prompt_for_directory() -> Result<PathBuf> {
    let input = read_answer("Enter the path to the folder containing the channel images: ")?;
    // Drag-and-drop on some terminals wraps the path in quotes
    let path = PathBuf::from(input.trim_matches(|c| c == '"' || c == '\''));

    if !path.is_dir() {
        return Err(Error::InvalidPath(path));
    }

    debug!("User input directory: {}", path.display());
    Ok(path)
}

/// Ask a yes/no question; anything but `y`/`yes` is no
pub fn confirm(question: &str) -> Result<bool> {
    let answer = read_answer(&format!("{} (y/n): ", question))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("sure"));
    }
}
