//! Terminal plumbing shared by the `train` and `estimate_price` binaries.

use std::io::{self, BufRead, Write};

/// Runs `body` on a blocking thread while waiting for Ctrl-C. An interrupt
/// ends the process with a farewell and exit status 0.
pub fn run_until_interrupted<T, F>(body: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(interruptible(body))
}

async fn interruptible<T, F>(body: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::select! {
        finished = tokio::task::spawn_blocking(body) => finished?,
        interrupted = tokio::signal::ctrl_c() => {
            interrupted?;
            println!("\nYou have pressed CTRL+C");
            println!("Goodbye. See you around!");
            std::process::exit(0)
        }
    }
}

/// Prints `message` and reads one line. Closed input is an error.
pub fn read_line<R, W>(input: &mut R, output: &mut W, message: &str) -> io::Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }

    Ok(line.trim().to_string())
}

/// Asks until the answer parses as a number and passes `check`.
pub fn read_number<R, W, F>(
    input: &mut R,
    output: &mut W,
    message: &str,
    check: F,
) -> io::Result<f64>
where
    R: BufRead,
    W: Write,
    F: Fn(f64) -> Result<(), String>,
{
    loop {
        let answer = read_line(input, output, message)?;

        let Ok(value) = answer.parse::<f64>() else {
            writeln!(output, "Invalid input. Please enter numerical values.")?;
            continue;
        };

        match check(value) {
            Ok(()) => return Ok(value),
            Err(reason) => writeln!(output, "{reason}")?,
        }
    }
}

/// Accepts values in `[low, high]`.
pub fn within(low: f64, high: f64, name: &str) -> impl Fn(f64) -> Result<(), String> + '_ {
    move |value| {
        if (low..=high).contains(&value) {
            Ok(())
        } else {
            Err(format!(
                "The {name} should be between {low} and {high}. Please try again."
            ))
        }
    }
}
