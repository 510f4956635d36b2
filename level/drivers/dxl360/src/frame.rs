use level_traits::{LevelError, Result, Sample};

/// Every frame on the wire is `X<sign>ddddY<sign>dddd`, back to back.
pub const FRAME_LEN: usize = 12;
pub const SYNC_BYTE: u8 = b'X';
const Y_MARKER: u8 = b'Y';
const FIELD_MAX: i16 = 9999;

/// Decodes one frame into (angle_x, angle_y) in degrees.
///
/// The device sends hundredths of a degree, so `X+0012Y-0034` is (0.12, -0.34).
pub fn parse_frame(bytes: &[u8]) -> Result<(f64, f64)> {
    let frame: &[u8; FRAME_LEN] = bytes
        .try_into()
        .map_err(|_| LevelError::invalid_data(bytes))?;

    if frame[0] != SYNC_BYTE || frame[6] != Y_MARKER {
        return Err(LevelError::invalid_data(bytes));
    }

    let x = parse_field(&frame[1..6]).ok_or_else(|| LevelError::invalid_data(bytes))?;
    let y = parse_field(&frame[7..12]).ok_or_else(|| LevelError::invalid_data(bytes))?;

    Ok((f64::from(x) / 100.0, f64::from(y) / 100.0))
}

// <sign><4 digits>
fn parse_field(field: &[u8]) -> Option<i16> {
    let (sign, digits) = field.split_first()?;
    let sign = match sign {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let magnitude = digits.iter().try_fold(0i16, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + i16::from(b - b'0'))
    })?;
    Some(sign * magnitude)
}

/// Builds the wire frame for the given hundredths of a degree, clamped to the
/// four digits the device can send.
pub fn encode_frame(x_hundredths: i16, y_hundredths: i16) -> [u8; FRAME_LEN] {
    let x = x_hundredths.clamp(-FIELD_MAX, FIELD_MAX);
    let y = y_hundredths.clamp(-FIELD_MAX, FIELD_MAX);
    let text = format!("X{:+05}Y{:+05}", x, y);

    let mut frame = [0u8; FRAME_LEN];
    frame.copy_from_slice(text.as_bytes());
    frame
}

/// Column layout shared by the console tee and the session log:
/// seconds left aligned in 10 with 1 decimal, then both angles in 6 columns
/// with 2 decimals and a space where a `+` would go.
pub fn format_sample(sample: &Sample) -> String {
    format!(
        "{:<10.1} {} {}",
        sample.seconds,
        signed_field(sample.angle_x),
        signed_field(sample.angle_y)
    )
}

fn signed_field(value: f64) -> String {
    let digits = format!("{:.2}", value);
    if digits.starts_with('-') {
        format!("{:>6}", digits)
    } else {
        format!("{:>6}", format!(" {}", digits))
    }
}
