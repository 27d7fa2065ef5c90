use std::io::Write;

pub fn read_stdin_buf<P>(prompt: P, buffer: &mut String) -> std::io::Result<usize>
where
    P: AsRef<str>
{
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    stdout.write_all(prompt.as_ref().as_bytes())?;
    stdout.flush()?;

    stdin.read_line(buffer)
}

/// `None` once stdin is closed
pub fn read_stdin<P>(prompt: P) -> std::io::Result<Option<String>>
where
    P: AsRef<str>
{
    let mut buffer = String::new();

    if read_stdin_buf(prompt, &mut buffer)? == 0 {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

pub fn read_stdin_trimmed<P>(prompt: P) -> std::io::Result<String>
where
    P: AsRef<str>
{
    let given = read_stdin(prompt)?.unwrap_or_default();

    Ok(given.trim().to_owned())
}

pub fn read_password<P>(prompt: P) -> std::io::Result<String>
where
    P: ToString
{
    rpassword::prompt_password(prompt)
}

pub fn read_yn<P>(prefix: P) -> std::io::Result<bool>
where
    P: std::fmt::Display
{
    let prompt = format!("{} [y|n]: ", prefix);

    Ok(is_yes(&read_stdin_trimmed(prompt)?))
}

fn is_yes(given: &str) -> bool {
    given.chars()
        .next()
        .map(|first| first.to_ascii_lowercase() == 'y')
        .unwrap_or(false)
}
