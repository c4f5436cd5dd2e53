//! File encodings for generated screens.

use crate::error::OutputError;
use ordered_screen::{GeneratedScreen, MaskData, MaskKind, OutputFormat, ScreenWarning};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Cursor;
use std::str::FromStr;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenFormat {
    /// 8-bit thresholds, row-major, no header
    Raw,
    /// Binary 8-bit PGM
    Pgm,
    /// PostScript HalftoneType 3 dictionary
    Ps,
    /// 16-bit grayscale PNG
    Png,
    /// Text, one `x y` pair per line
    Tos,
    /// JSON report with the mask data
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format '{0}' (expected raw, pgm, ps, png, tos or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for ScreenFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "bin" => Ok(ScreenFormat::Raw),
            "pgm" => Ok(ScreenFormat::Pgm),
            "ps" => Ok(ScreenFormat::Ps),
            "png" => Ok(ScreenFormat::Png),
            "tos" => Ok(ScreenFormat::Tos),
            "json" => Ok(ScreenFormat::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl ScreenFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ScreenFormat::Raw => "raw",
            ScreenFormat::Pgm => "pgm",
            ScreenFormat::Ps => "ps",
            ScreenFormat::Png => "png",
            ScreenFormat::Tos => "tos",
            ScreenFormat::Json => "json",
        }
    }

    /// Mask data shape this format writes, `None` if it takes either
    pub fn required_data(self) -> Option<OutputFormat> {
        match self {
            ScreenFormat::Raw | ScreenFormat::Pgm | ScreenFormat::Ps | ScreenFormat::Png => {
                Some(OutputFormat::ThresholdGrid)
            }
            ScreenFormat::Tos => Some(OutputFormat::TurnOnSequence),
            ScreenFormat::Json => None,
        }
    }

    /// Mask data to request from the generator for this format
    ///
    /// `sequence` asks for a turn-on sequence; grid formats reject it.
    pub fn data_shape(self, sequence: bool) -> Result<OutputFormat, OutputError> {
        match self.required_data() {
            Some(OutputFormat::ThresholdGrid) if sequence => Err(OutputError::UnsupportedData {
                format: self.extension(),
                data: "a turn-on sequence",
            }),
            Some(required) => Ok(required),
            None if sequence => Ok(OutputFormat::TurnOnSequence),
            None => Ok(OutputFormat::ThresholdGrid),
        }
    }
}

/// File name used when no output path is given
pub fn default_file_name(screen: &GeneratedScreen, format: ScreenFormat) -> String {
    let (width, height) = (screen.mask.width(), screen.mask.height());
    match screen.kind {
        MaskKind::Holladay => format!(
            "Screen_Holladay_Shift{}_{}x{}.{}",
            screen.shift,
            width,
            height,
            format.extension()
        ),
        _ => format!(
            "Screen_Dithered_{}x{}.{}",
            width,
            height,
            format.extension()
        ),
    }
}

/// Encode a generated screen in the given format
pub fn encode(screen: &GeneratedScreen, format: ScreenFormat) -> Result<Vec<u8>, OutputError> {
    match format {
        ScreenFormat::Raw => Ok(to_bytes(thresholds(screen, format)?)),
        ScreenFormat::Pgm => encode_pgm(screen),
        ScreenFormat::Ps => encode_ps(screen),
        ScreenFormat::Png => encode_png(screen),
        ScreenFormat::Tos => encode_tos(screen),
        ScreenFormat::Json => Ok(serde_json::to_vec_pretty(&ScreenReport::new(screen))?),
    }
}

fn thresholds(screen: &GeneratedScreen, format: ScreenFormat) -> Result<&[u16], OutputError> {
    screen
        .mask
        .thresholds()
        .ok_or_else(|| OutputError::UnsupportedData {
            format: format.extension(),
            data: "a turn-on sequence",
        })
}

fn to_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().map(|&v| (v >> 8) as u8).collect()
}

fn kind_label(kind: MaskKind) -> &'static str {
    match kind {
        MaskKind::Holladay => "Holladay_Shift",
        _ => "Dithered",
    }
}

fn encode_pgm(screen: &GeneratedScreen) -> Result<Vec<u8>, OutputError> {
    let values = thresholds(screen, ScreenFormat::Pgm)?;
    let (width, height) = (screen.mask.width(), screen.mask.height());
    let header = format!(
        "P5\n# Halftone threshold array, {}, [{}, {}], S={}\n{} {}\n255\n",
        kind_label(screen.kind),
        width,
        height,
        screen.shift,
        width,
        height
    );
    let mut out = header.into_bytes();
    out.extend(to_bytes(values));
    Ok(out)
}

fn encode_ps(screen: &GeneratedScreen) -> Result<Vec<u8>, OutputError> {
    let values = thresholds(screen, ScreenFormat::Ps)?;
    let (width, height) = (screen.mask.width(), screen.mask.height());
    let mut out = format!(
        "%!PS\n<< /HalftoneType 3\n   /Width  {width}\n   /Height {height}\n   /Thresholds <\n"
    );
    for row in values.chunks(width) {
        for (x, &value) in row.iter().enumerate() {
            // Writing to a String cannot fail.
            let _ = write!(out, "{:02x}", value >> 8);
            if x % 32 == 31 && x != width - 1 {
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out.push_str("   >\n>>\n");
    Ok(out.into_bytes())
}

fn encode_png(screen: &GeneratedScreen) -> Result<Vec<u8>, OutputError> {
    let values = thresholds(screen, ScreenFormat::Png)?;
    let packed: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(
            &mut buf,
            screen.mask.width() as u32,
            screen.mask.height() as u32,
        );
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Sixteen);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&packed)?;
    }
    Ok(buf.into_inner())
}

fn encode_tos(screen: &GeneratedScreen) -> Result<Vec<u8>, OutputError> {
    let sequence = screen
        .mask
        .sequence()
        .ok_or(OutputError::UnsupportedData {
            format: "tos",
            data: "a threshold grid",
        })?;
    let mut out = String::with_capacity(sequence.len() * 8);
    for &(x, y) in sequence {
        let _ = writeln!(out, "{x} {y}");
    }
    Ok(out.into_bytes())
}

/// Lattice cell as written in JSON reports
#[derive(Debug, Serialize)]
pub struct CellReport {
    pub x: i64,
    pub y: i64,
    pub u: i64,
    pub v: i64,
    pub n: i64,
    pub angle: f64,
    pub lpi: f64,
}

/// JSON view of a generated screen
#[derive(Debug, Serialize)]
pub struct ScreenReport<'a> {
    pub kind: &'static str,
    pub width: usize,
    pub height: usize,
    pub shift: i64,
    pub num_levels: u32,
    pub cell: CellReport,
    pub bin_center: [f64; 2],
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<&'a [u16]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<&'a [(u32, u32)]>,
}

impl<'a> ScreenReport<'a> {
    pub fn new(screen: &'a GeneratedScreen) -> Self {
        let kind = match screen.kind {
            MaskKind::Holladay => "holladay",
            MaskKind::NonDithered => "nondithered",
            MaskKind::Dithered { .. } => "dithered",
        };
        let cell = &screen.cell;
        let center = screen.mask.bin_center();
        let (thresholds, sequence) = match screen.mask.data() {
            MaskData::Thresholds(values) => (Some(values.as_slice()), None),
            MaskData::TurnOnSequence(pairs) => (None, Some(pairs.as_slice())),
        };

        Self {
            kind,
            width: screen.mask.width(),
            height: screen.mask.height(),
            shift: screen.shift,
            num_levels: screen.num_levels,
            cell: CellReport {
                x: cell.x,
                y: cell.y,
                u: cell.u,
                v: cell.v,
                n: cell.n,
                angle: cell.angle,
                lpi: cell.lpi,
            },
            bin_center: [center.x, center.y],
            warnings: screen.warnings.iter().map(ScreenWarning::to_string).collect(),
            thresholds,
            sequence,
        }
    }
}
