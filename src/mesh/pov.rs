use super::SceneCommand;
use crate::geometry::{Point2D, Scaler};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Significant digits of every number written
const PRECISION: i32 = 12;

/// Serialises scene commands as POV-Ray scene description.
///
/// The local plane maps to the scene's x/z plane through `scaler`; heights
/// go to the y axis with the same scale.
pub struct PovWriter<W: Write> {
    out: W,
    scaler: Scaler,
}

impl<W: Write> PovWriter<W> {
    pub fn new(out: W, scaler: Scaler) -> Self {
        Self { out, scaler }
    }

    /// Camera looking down at the scene at 45 degrees, plus the style include
    pub fn write_header(&mut self, scene_size: f64, style_include: &str) -> Result<()> {
        writeln!(
            self.out,
            "camera {{ orthographic location <0,0,{}> direction <0,0,13> up <0,{},0> right <{},0,0> look_at <0,0,0> rotate <45,0,0> translate <{},0,{}> }}",
            num(-1.15 * scene_size),
            num(0.3535 * scene_size),
            num(scene_size / 2.0),
            num(scene_size / 2.0),
            num(scene_size / 2.0),
        )?;
        writeln!(self.out, "#include \"{}\"", style_include)?;
        Ok(())
    }

    pub fn write_command(&mut self, command: &SceneCommand) -> Result<()> {
        match command {
            SceneCommand::Comment(text) => {
                writeln!(self.out, " // {}", text)?;
            }
            SceneCommand::Triangles {
                style,
                elevation,
                triangles,
            } => {
                let y = num(self.scaler.scale_length(*elevation));
                for triangle in triangles {
                    let [a, b, c] = triangle.map(|p| self.vertex(p, &y));
                    writeln!(
                        self.out,
                        "triangle {{ {},{},{} texture {{ {} }} }}",
                        a, b, c, style
                    )?;
                }
            }
            SceneCommand::Box {
                origin,
                width,
                height,
                length,
                angle,
                style,
            } => {
                let half = self.scaler.scale_length(*width) / 2.0;
                let (x, z) = self.scaler.scale(*origin);
                writeln!(
                    self.out,
                    "box {{ <0,0,{}>, <{},{},{}> texture {{ {} }} rotate <0,{},0> translate <{},0,{}> }}",
                    num(-half),
                    num(self.scaler.scale_length(*length)),
                    num(self.scaler.scale_length(*height)),
                    num(half),
                    style,
                    num(*angle),
                    num(x),
                    num(z),
                )?;
            }
            SceneCommand::Wall {
                from,
                to,
                bottom,
                top,
                style,
            } => {
                let bottom = num(self.scaler.scale_length(*bottom));
                let top = num(self.scaler.scale_length(*top));
                let a = self.vertex(*from, &bottom);
                writeln!(
                    self.out,
                    "polygon {{ 5, {},{},{},{},{} texture {{ {} }} }}",
                    a,
                    self.vertex(*from, &top),
                    self.vertex(*to, &top),
                    self.vertex(*to, &bottom),
                    a,
                    style
                )?;
            }
            SceneCommand::Cylinder {
                center,
                radius,
                height,
                style,
            } => {
                let (x, z) = self.scaler.scale(*center);
                writeln!(
                    self.out,
                    "cylinder {{ <0,{},0>, <0,0,0>, {} texture {{ {} }} translate <{},0,{}> }}",
                    num(self.scaler.scale_length(*height)),
                    num(self.scaler.scale_length(*radius)),
                    style,
                    num(x),
                    num(z),
                )?;
            }
            SceneCommand::Sprite {
                position,
                style,
                variant,
                scale,
            } => {
                let (x, z) = self.scaler.scale(*position);
                writeln!(
                    self.out,
                    "plane {{ z, 0 hollow on clipped_by {{ box {{ <0,0,-1>, <1,1,1> }} }} texture {{ {}{} }} translate <-0.5,0,0> scale {} translate <{},0,{}> }}",
                    style,
                    variant,
                    num(*scale),
                    num(x),
                    num(z),
                )?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn vertex(&self, p: Point2D, y: &str) -> String {
        let (x, z) = self.scaler.scale(p);
        format!("<{},{},{}>", num(x), y, num(z))
    }
}

/// Write a whole scene to a POV-Ray file
pub fn write_pov(
    path: &Path,
    commands: &[SceneCommand],
    scaler: Scaler,
    scene_size: f64,
    style_include: &str,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create scene file: {}", path.display()))?;
    let mut writer = PovWriter::new(BufWriter::new(file), scaler);

    writer.write_header(scene_size, style_include)?;
    for command in commands {
        writer
            .write_command(command)
            .with_context(|| format!("Failed to write scene file: {}", path.display()))?;
    }
    writer.finish()?;

    Ok(())
}

/// Format with at most 12 significant digits and no trailing zeros
fn num(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (PRECISION - 1 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
