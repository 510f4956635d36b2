use crate::session::Capture;
use dxl360::format_sample;
use level_traits::{LevelError, Result, Sample};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes one line per sample, replacing whatever was at `path`.
pub fn write_log<P, I>(path: P, samples: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Sample>,
{
    let path = path.as_ref();
    let file = File::create(path)?;
    let count = write_samples(BufWriter::new(file), samples)?;
    debug!("Wrote {} samples to {}", count, path.display());
    Ok(count)
}

pub fn write_samples<W, I>(mut writer: W, samples: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Sample>,
{
    let mut count = 0;
    for sample in samples {
        writeln!(writer, "{}", format_sample(&sample))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Capture> {
    let file = File::open(path.as_ref())?;
    parse_log(BufReader::new(file))
}

/// Every line must be exactly `time angle_x angle_y`; anything else aborts.
pub fn parse_log<R: BufRead>(reader: R) -> Result<Capture> {
    let mut capture = Capture::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let sample = parse_line(&line).ok_or_else(|| LevelError::LogParse {
            line: index + 1,
            content: line.clone(),
        })?;
        capture.push(sample);
    }
    Ok(capture)
}

fn parse_line(line: &str) -> Option<Sample> {
    let mut tokens = line.split_whitespace().map(|token| token.parse::<f64>());
    let seconds = tokens.next()?.ok()?;
    let angle_x = tokens.next()?.ok()?;
    let angle_y = tokens.next()?.ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(Sample::new(seconds, angle_x, angle_y))
}
