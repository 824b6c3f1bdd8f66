use anyhow::{bail, Context};
use std::io::{BufRead, Write};

/// Asks the operator for a positive whole number.
pub fn ask_positive<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> anyhow::Result<u32> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("reading {label}"))?;
    if read == 0 {
        bail!("no value entered for {label}");
    }

    let answer = line.trim();
    let value: u32 = answer
        .parse()
        .with_context(|| format!("{label} expects a whole number, got {answer:?}"))?;
    if value == 0 {
        bail!("{label} must be greater than zero");
    }
    Ok(value)
}

/// Uses `given` when present, otherwise prompts for it.
pub fn resolve<R: BufRead, W: Write>(
    given: Option<u32>,
    input: &mut R,
    output: &mut W,
    label: &str,
) -> anyhow::Result<u32> {
    match given {
        Some(0) => bail!("{label} must be greater than zero"),
        Some(value) => Ok(value),
        None => ask_positive(input, output, label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_trimmed_integer() {
        let mut input = Cursor::new("48000 \n");
        let mut output = Vec::new();
        let value = ask_positive(&mut input, &mut output, "Sampling_Rate (In Hz):").unwrap();

        assert_eq!(value, 48_000);
        assert_eq!(output, b"Sampling_Rate (In Hz):");
    }

    #[test]
    fn rejects_non_numeric_and_zero() {
        let mut output = Vec::new();
        assert!(ask_positive(&mut Cursor::new("fast\n"), &mut output, "Rate:").is_err());
        assert!(ask_positive(&mut Cursor::new("0\n"), &mut output, "Rate:").is_err());
        assert!(ask_positive(&mut Cursor::new(""), &mut output, "Rate:").is_err());
    }

    #[test]
    fn given_value_skips_prompt() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(resolve(Some(5), &mut input, &mut output, "Time_Duration (In s):").unwrap(), 5);
        assert!(output.is_empty());
    }
}
