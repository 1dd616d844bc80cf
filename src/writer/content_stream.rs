//! PDF content stream encoder.
//!
//! [`ContentStream`] is the drawing API. Each call is validated against the
//! tracked graphics state and then serialized straight into the sink as
//! operands followed by one operator (ISO 32000-1:2008, Sections 8 and 9).
//!
//! ```
//! use pdf_scribe::fonts::{Font, FontEncoding, FontSubsetCollector};
//! use pdf_scribe::object::ObjectRef;
//! use pdf_scribe::writer::{ContentStream, Resources};
//!
//! let mut resources = Resources::new();
//! let mut subsets = FontSubsetCollector::new();
//! let font = Font::new(ObjectRef::new(4, 0), "Helvetica", FontEncoding::WinAnsi);
//!
//! let mut stream = ContentStream::new(Vec::new(), &mut resources, &mut subsets);
//! stream
//!     .begin_text()?
//!     .set_font(&font, 12.0)?
//!     .new_line_at_offset(72.0, 720.0)?
//!     .show_text("Hello")?
//!     .end_text()?;
//! let bytes = stream.close()?;
//!
//! assert_eq!(bytes, b"BT\n/F1 12 Tf\n72 720 Td\n(Hello) Tj\nET\n");
//! # Ok::<(), pdf_scribe::Error>(())
//! ```

use crate::color::{ColorSpace, PdColor};
use crate::config::NumberFormat;
use crate::error::{Error, Result};
use crate::fonts::{Font, FontSubsetCollector};
use crate::images::ImageXObject;
use crate::writer::graphics_state::GraphicsStateTracker;
use crate::writer::operators::{check_finite, OperatorWriter};
use crate::writer::resources::{ExtGState, FormXObject, PropertyList, Resources, Shading};
use std::io::Write;

/// Line cap style (J operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LineCap {
    /// Butt cap
    Butt = 0,
    /// Round cap
    Round = 1,
    /// Projecting square cap
    Square = 2,
}

impl TryFrom<i32> for LineCap {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(LineCap::Butt),
            1 => Ok(LineCap::Round),
            2 => Ok(LineCap::Square),
            other => Err(Error::UnsupportedValue(format!(
                "unknown value for line cap style: {}",
                other
            ))),
        }
    }
}

/// Line join style (j operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LineJoin {
    /// Miter join
    Miter = 0,
    /// Round join
    Round = 1,
    /// Bevel join
    Bevel = 2,
}

impl TryFrom<i32> for LineJoin {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(LineJoin::Miter),
            1 => Ok(LineJoin::Round),
            2 => Ok(LineJoin::Bevel),
            other => Err(Error::UnsupportedValue(format!(
                "unknown value for line join style: {}",
                other
            ))),
        }
    }
}

/// Rule deciding which areas a fill or clip covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingRule {
    /// Nonzero winding number rule (`f`, `W`)
    NonZero,
    /// Even-odd rule (`f*`, `W*`)
    EvenOdd,
}

impl TryFrom<i32> for WindingRule {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(WindingRule::NonZero),
            1 => Ok(WindingRule::EvenOdd),
            other => Err(Error::UnsupportedValue(format!(
                "unknown value for winding rule: {}",
                other
            ))),
        }
    }
}

/// Encoder for one content stream.
///
/// Owns the sink for the duration of authoring and borrows the page's
/// resource dictionary and the document's font subset collector. Call
/// [`ContentStream::close`] exactly once to flush and get the sink back.
#[derive(Debug)]
pub struct ContentStream<'a, W: Write> {
    writer: OperatorWriter<W>,
    resources: &'a mut Resources,
    subsets: &'a mut FontSubsetCollector,
    state: GraphicsStateTracker,
}

impl<'a, W: Write> ContentStream<'a, W> {
    /// Create an encoder writing to `sink` with the default number format.
    pub fn new(
        sink: W,
        resources: &'a mut Resources,
        subsets: &'a mut FontSubsetCollector,
    ) -> Self {
        Self::with_format(sink, resources, subsets, NumberFormat::default())
    }

    /// Create an encoder with an explicit number format.
    pub fn with_format(
        sink: W,
        resources: &'a mut Resources,
        subsets: &'a mut FontSubsetCollector,
        format: NumberFormat,
    ) -> Self {
        Self {
            writer: OperatorWriter::with_format(sink, format),
            resources,
            subsets,
            state: GraphicsStateTracker::new(),
        }
    }

    /// The tracked graphics state.
    pub fn state(&self) -> &GraphicsStateTracker {
        &self.state
    }

    /// The page resources bound so far.
    pub fn resources(&self) -> &Resources {
        self.resources
    }

    /// Bytes written so far.
    pub fn sink(&self) -> &W {
        self.writer.get_ref()
    }

    // === Text objects ===

    /// Begin a text object (`BT`).
    pub fn begin_text(&mut self) -> Result<&mut Self> {
        self.state.begin_text()?;
        self.writer.write_operator("BT")?;
        Ok(self)
    }

    /// End a text object (`ET`).
    pub fn end_text(&mut self) -> Result<&mut Self> {
        self.state.end_text()?;
        self.writer.write_operator("ET")?;
        Ok(self)
    }

    /// Select a font and size (`/Fn size Tf`).
    ///
    /// Fonts marked for subsetting are registered with the subset collector.
    pub fn set_font(&mut self, font: &Font, size: f32) -> Result<&mut Self> {
        check_finite(&[size])?;
        if font.will_be_subset() && !self.subsets.is_registered(font) {
            self.subsets.register(font);
        }
        let name = self.resources.add(font);
        self.state.set_font(font.clone());

        self.writer.write_name(&name)?;
        self.writer.write_real(size)?;
        self.writer.write_operator("Tf")?;
        Ok(self)
    }

    /// Show text with the current font (`(...) Tj`).
    pub fn show_text(&mut self, text: &str) -> Result<&mut Self> {
        self.state.require_inside_text("showText")?;
        let font = self
            .state
            .font()
            .cloned()
            .ok_or_else(|| Error::Sequence("must call setFont before showText".to_string()))?;

        let encoded = font.encode(text)?;
        if font.will_be_subset() {
            for ch in text.chars() {
                self.subsets.add_code_point(&font, ch as u32);
            }
        }

        self.writer.write_string(&encoded)?;
        self.writer.write_operator("Tj")?;
        Ok(self)
    }

    /// Set the text leading (`TL`).
    pub fn set_leading(&mut self, leading: f32) -> Result<&mut Self> {
        self.writer.write_real(leading)?;
        self.writer.write_operator("TL")?;
        Ok(self)
    }

    /// Move to the start of the next line (`T*`).
    pub fn new_line(&mut self) -> Result<&mut Self> {
        self.state.require_inside_text("newLine")?;
        self.writer.write_operator("T*")?;
        Ok(self)
    }

    /// Move to the start of the next line, offset from the current line start (`Td`).
    pub fn new_line_at_offset(&mut self, tx: f32, ty: f32) -> Result<&mut Self> {
        self.state.require_inside_text("newLineAtOffset")?;
        self.write_reals(&[tx, ty], "Td")
    }

    /// Set the text matrix (`Tm`).
    pub fn set_text_matrix(
        &mut self,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    ) -> Result<&mut Self> {
        self.state.require_inside_text("setTextMatrix")?;
        self.write_reals(&[a, b, c, d, e, f], "Tm")
    }

    // === Graphics state ===

    /// Concatenate a matrix to the current transformation matrix (`cm`).
    pub fn transform(
        &mut self,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    ) -> Result<&mut Self> {
        self.write_reals(&[a, b, c, d, e, f], "cm")
    }

    /// Save the graphics state (`q`).
    pub fn save_graphics_state(&mut self) -> Result<&mut Self> {
        self.state.save();
        self.writer.write_operator("q")?;
        Ok(self)
    }

    /// Restore the graphics state (`Q`).
    pub fn restore_graphics_state(&mut self) -> Result<&mut Self> {
        self.state.restore();
        self.writer.write_operator("Q")?;
        Ok(self)
    }

    /// Apply an extended graphics state (`/gsN gs`).
    pub fn set_graphics_state_parameters(&mut self, ext_gstate: &ExtGState) -> Result<&mut Self> {
        let name = self.resources.add(ext_gstate);
        self.writer.write_name(&name)?;
        self.writer.write_operator("gs")?;
        Ok(self)
    }

    // === Color ===

    /// Select the stroking color space (`CS`).
    pub fn set_stroking_color_space(&mut self, cs: &ColorSpace) -> Result<&mut Self> {
        let name = self.color_space_name(cs);
        self.state.set_stroking_color_space(cs.clone());
        self.writer.write_name(&name)?;
        self.writer.write_operator("CS")?;
        Ok(self)
    }

    /// Select the non-stroking color space (`cs`).
    pub fn set_non_stroking_color_space(&mut self, cs: &ColorSpace) -> Result<&mut Self> {
        let name = self.color_space_name(cs);
        self.state.set_non_stroking_color_space(cs.clone());
        self.writer.write_name(&name)?;
        self.writer.write_operator("cs")?;
        Ok(self)
    }

    /// Set the stroking color (`SC`), selecting its color space first when it changed.
    pub fn set_stroking_color(&mut self, color: &PdColor) -> Result<&mut Self> {
        check_component_count(color)?;
        check_finite(color.components())?;
        if self.state.stroking_color_space() != Some(color.color_space()) {
            self.set_stroking_color_space(color.color_space())?;
        }
        self.write_reals(color.components(), "SC")
    }

    /// Set the non-stroking color (`sc`), selecting its color space first when it changed.
    pub fn set_non_stroking_color(&mut self, color: &PdColor) -> Result<&mut Self> {
        check_component_count(color)?;
        check_finite(color.components())?;
        if self.state.non_stroking_color_space() != Some(color.color_space()) {
            self.set_non_stroking_color_space(color.color_space())?;
        }
        self.write_reals(color.components(), "sc")
    }

    /// Stroking DeviceRGB color from 0-255 components (`RG`).
    pub fn set_stroking_rgb(&mut self, r: i32, g: i32, b: i32) -> Result<&mut Self> {
        let components = scale_255(&[r, g, b], "RGB")?;
        self.write_reals(&components, "RG")
    }

    /// Non-stroking DeviceRGB color from 0-255 components (`rg`).
    pub fn set_non_stroking_rgb(&mut self, r: i32, g: i32, b: i32) -> Result<&mut Self> {
        let components = scale_255(&[r, g, b], "RGB")?;
        self.write_reals(&components, "rg")
    }

    /// Stroking DeviceCMYK color from 0-1 components (`K`).
    pub fn set_stroking_cmyk(&mut self, c: f32, m: f32, y: f32, k: f32) -> Result<&mut Self> {
        check_unit(&[c, m, y, k], "CMYK")?;
        self.write_reals(&[c, m, y, k], "K")
    }

    /// Non-stroking DeviceCMYK color from 0-1 components (`k`).
    pub fn set_non_stroking_cmyk(&mut self, c: f32, m: f32, y: f32, k: f32) -> Result<&mut Self> {
        check_unit(&[c, m, y, k], "CMYK")?;
        self.write_reals(&[c, m, y, k], "k")
    }

    /// Stroking DeviceCMYK color from 0-255 components (`K`).
    pub fn set_stroking_cmyk_255(&mut self, c: i32, m: i32, y: i32, k: i32) -> Result<&mut Self> {
        let components = scale_255(&[c, m, y, k], "CMYK")?;
        self.write_reals(&components, "K")
    }

    /// Non-stroking DeviceCMYK color from 0-255 components (`k`).
    pub fn set_non_stroking_cmyk_255(
        &mut self,
        c: i32,
        m: i32,
        y: i32,
        k: i32,
    ) -> Result<&mut Self> {
        let components = scale_255(&[c, m, y, k], "CMYK")?;
        self.write_reals(&components, "k")
    }

    /// Stroking DeviceGray level from 0-1 (`G`).
    pub fn set_stroking_gray(&mut self, gray: f32) -> Result<&mut Self> {
        check_unit(&[gray], "gray")?;
        self.write_reals(&[gray], "G")
    }

    /// Non-stroking DeviceGray level from 0-1 (`g`).
    pub fn set_non_stroking_gray(&mut self, gray: f32) -> Result<&mut Self> {
        check_unit(&[gray], "gray")?;
        self.write_reals(&[gray], "g")
    }

    /// Stroking DeviceGray level from 0-255 (`G`).
    pub fn set_stroking_gray_255(&mut self, gray: i32) -> Result<&mut Self> {
        let components = scale_255(&[gray], "gray")?;
        self.write_reals(&components, "G")
    }

    /// Non-stroking DeviceGray level from 0-255 (`g`).
    pub fn set_non_stroking_gray_255(&mut self, gray: i32) -> Result<&mut Self> {
        let components = scale_255(&[gray], "gray")?;
        self.write_reals(&components, "g")
    }

    // === Path construction ===

    /// Append a rectangle (`re`).
    pub fn add_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<&mut Self> {
        self.state.require_outside_text("addRect")?;
        self.write_reals(&[x, y, width, height], "re")
    }

    /// Append a cubic Bézier curve with two control points (`c`).
    pub fn curve_to(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Result<&mut Self> {
        self.state.require_outside_text("curveTo")?;
        self.write_reals(&[x1, y1, x2, y2, x3, y3], "c")
    }

    /// Append a curve whose first control point is the current point (`v`).
    pub fn curve_to_v(&mut self, x2: f32, y2: f32, x3: f32, y3: f32) -> Result<&mut Self> {
        self.state.require_outside_text("curveTo2")?;
        self.write_reals(&[x2, y2, x3, y3], "v")
    }

    /// Append a curve whose second control point is the end point (`y`).
    pub fn curve_to_y(&mut self, x1: f32, y1: f32, x3: f32, y3: f32) -> Result<&mut Self> {
        self.state.require_outside_text("curveTo1")?;
        self.write_reals(&[x1, y1, x3, y3], "y")
    }

    /// Begin a new subpath (`m`).
    pub fn move_to(&mut self, x: f32, y: f32) -> Result<&mut Self> {
        self.state.require_outside_text("moveTo")?;
        self.write_reals(&[x, y], "m")
    }

    /// Append a straight line segment (`l`).
    pub fn line_to(&mut self, x: f32, y: f32) -> Result<&mut Self> {
        self.state.require_outside_text("lineTo")?;
        self.write_reals(&[x, y], "l")
    }

    /// Append a closed polygon through the given vertices (`m`, `l`..., `h`).
    pub fn add_polygon(&mut self, xs: &[f32], ys: &[f32]) -> Result<&mut Self> {
        self.state.require_outside_text("addPolygon")?;
        if xs.len() != ys.len() {
            return Err(Error::Format(format!(
                "some points are missing coordinates: {} x values, {} y values",
                xs.len(),
                ys.len()
            )));
        }
        check_finite(xs)?;
        check_finite(ys)?;
        for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            if i == 0 {
                self.move_to(x, y)?;
            } else {
                self.line_to(x, y)?;
            }
        }
        self.close_path()
    }

    /// Close the current subpath (`h`).
    pub fn close_path(&mut self) -> Result<&mut Self> {
        self.state.require_outside_text("closePath")?;
        self.writer.write_operator("h")?;
        Ok(self)
    }

    // === Painting ===

    /// Stroke the path (`S`).
    pub fn stroke(&mut self) -> Result<&mut Self> {
        self.path_operator("stroke", "S")
    }

    /// Close and stroke the path (`s`).
    pub fn close_and_stroke(&mut self) -> Result<&mut Self> {
        self.path_operator("closeAndStroke", "s")
    }

    /// Fill the path using the nonzero winding rule (`f`).
    pub fn fill(&mut self) -> Result<&mut Self> {
        self.path_operator("fill", "f")
    }

    /// Fill the path using the even-odd rule (`f*`).
    pub fn fill_even_odd(&mut self) -> Result<&mut Self> {
        self.path_operator("fillEvenOdd", "f*")
    }

    /// Fill the path with an explicit winding rule.
    pub fn fill_with_rule(&mut self, rule: WindingRule) -> Result<&mut Self> {
        match rule {
            WindingRule::NonZero => self.fill(),
            WindingRule::EvenOdd => self.fill_even_odd(),
        }
    }

    /// Fill then stroke the path (`B`).
    pub fn fill_and_stroke(&mut self) -> Result<&mut Self> {
        self.path_operator("fillAndStroke", "B")
    }

    /// Fill (even-odd) then stroke the path (`B*`).
    pub fn fill_and_stroke_even_odd(&mut self) -> Result<&mut Self> {
        self.path_operator("fillAndStrokeEvenOdd", "B*")
    }

    /// Close, fill then stroke the path (`b`).
    pub fn close_fill_and_stroke(&mut self) -> Result<&mut Self> {
        self.path_operator("closeFillAndStroke", "b")
    }

    /// Close, fill (even-odd) then stroke the path (`b*`).
    pub fn close_fill_and_stroke_even_odd(&mut self) -> Result<&mut Self> {
        self.path_operator("closeFillAndStrokeEvenOdd", "b*")
    }

    /// End the path without painting (`n`).
    pub fn end_path(&mut self) -> Result<&mut Self> {
        self.path_operator("endPath", "n")
    }

    /// Paint a shading over the current clip (`/shN sh`).
    pub fn shading_fill(&mut self, shading: &Shading) -> Result<&mut Self> {
        self.state.require_outside_text("shadingFill")?;
        let name = self.resources.add(shading);
        self.writer.write_name(&name)?;
        self.writer.write_operator("sh")?;
        Ok(self)
    }

    // === Clipping ===

    /// Intersect the clip with the path using the nonzero rule (`W n`).
    pub fn clip(&mut self) -> Result<&mut Self> {
        self.state.require_outside_text("clip")?;
        self.writer.write_operator("W")?;
        self.writer.write_operator("n")?;
        Ok(self)
    }

    /// Intersect the clip with the path using the even-odd rule (`W* n`).
    pub fn clip_even_odd(&mut self) -> Result<&mut Self> {
        self.state.require_outside_text("clipEvenOdd")?;
        self.writer.write_operator("W*")?;
        self.writer.write_operator("n")?;
        Ok(self)
    }

    /// Clip with an explicit winding rule.
    pub fn clip_with_rule(&mut self, rule: WindingRule) -> Result<&mut Self> {
        match rule {
            WindingRule::NonZero => self.clip(),
            WindingRule::EvenOdd => self.clip_even_odd(),
        }
    }

    // === Line style ===

    /// Set the line width (`w`).
    pub fn set_line_width(&mut self, width: f32) -> Result<&mut Self> {
        self.state.require_outside_text("setLineWidth")?;
        self.write_reals(&[width], "w")
    }

    /// Set the line join style, 0 to 2 (`j`).
    pub fn set_line_join_style(&mut self, style: i32) -> Result<&mut Self> {
        self.state.require_outside_text("setLineJoinStyle")?;
        let join = LineJoin::try_from(style)?;
        self.writer.write_integer(join as i64)?;
        self.writer.write_operator("j")?;
        Ok(self)
    }

    /// Set the line cap style, 0 to 2 (`J`).
    pub fn set_line_cap_style(&mut self, style: i32) -> Result<&mut Self> {
        self.state.require_outside_text("setLineCapStyle")?;
        let cap = LineCap::try_from(style)?;
        self.writer.write_integer(cap as i64)?;
        self.writer.write_operator("J")?;
        Ok(self)
    }

    /// Set the dash pattern (`[...] phase d`).
    pub fn set_line_dash_pattern(&mut self, pattern: &[f32], phase: f32) -> Result<&mut Self> {
        self.state.require_outside_text("setLineDashPattern")?;
        check_finite(pattern)?;
        check_finite(&[phase])?;
        self.writer.write_raw("[")?;
        self.writer.write_reals(pattern)?;
        self.writer.write_raw("] ")?;
        self.write_reals(&[phase], "d")
    }

    /// Set the miter limit (`M`).
    pub fn set_miter_limit(&mut self, limit: f32) -> Result<&mut Self> {
        self.state.require_outside_text("setMiterLimit")?;
        self.write_reals(&[limit], "M")
    }

    // === XObjects ===

    /// Draw an image scaled into the given rectangle (`q`, `cm`, `/ImN Do`, `Q`).
    pub fn draw_image(
        &mut self,
        image: &ImageXObject,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<&mut Self> {
        self.state.require_outside_text("drawImage")?;
        check_finite(&[x, y, width, height])?;
        let name = self.resources.add(image);

        self.save_graphics_state()?;
        self.transform(width, 0.0, 0.0, height, x, y)?;
        self.writer.write_name(&name)?;
        self.writer.write_operator("Do")?;
        self.restore_graphics_state()
    }

    /// Draw an image at its natural size in user space units.
    pub fn draw_image_at(&mut self, image: &ImageXObject, x: f32, y: f32) -> Result<&mut Self> {
        self.draw_image(image, x, y, image.width() as f32, image.height() as f32)
    }

    /// Draw a form XObject (`/FormN Do`).
    pub fn draw_form(&mut self, form: &FormXObject) -> Result<&mut Self> {
        self.state.require_outside_text("drawForm")?;
        let name = self.resources.add(form);
        self.writer.write_name(&name)?;
        self.writer.write_operator("Do")?;
        Ok(self)
    }

    // === Marked content ===

    /// Begin a marked-content sequence (`/tag BMC`).
    pub fn begin_marked_content(&mut self, tag: &str) -> Result<&mut Self> {
        self.writer.write_name(tag)?;
        self.writer.write_operator("BMC")?;
        Ok(self)
    }

    /// Begin a marked-content sequence with a property list (`/tag /PropN BDC`).
    pub fn begin_marked_content_with_properties(
        &mut self,
        tag: &str,
        properties: &PropertyList,
    ) -> Result<&mut Self> {
        let name = self.resources.add(properties);
        self.writer.write_name(tag)?;
        self.writer.write_name(&name)?;
        self.writer.write_operator("BDC")?;
        Ok(self)
    }

    /// End a marked-content sequence (`EMC`).
    pub fn end_marked_content(&mut self) -> Result<&mut Self> {
        self.writer.write_operator("EMC")?;
        Ok(self)
    }

    // === Raw output ===

    /// Write commands verbatim. No state tracking is applied.
    pub fn append_raw_commands(&mut self, commands: &str) -> Result<&mut Self> {
        self.writer.write_raw(commands)?;
        Ok(self)
    }

    /// Write bytes verbatim. No state tracking is applied.
    pub fn append_raw_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.writer.write_bytes(bytes)?;
        Ok(self)
    }

    /// Finish authoring: flush the sink and return it.
    ///
    /// Fails if a text object is still open.
    pub fn close(mut self) -> Result<W> {
        if self.state.in_text_mode() {
            return Err(Error::Sequence(
                "content stream closed inside a text object".to_string(),
            ));
        }
        self.writer.flush()?;
        Ok(self.writer.into_inner())
    }

    fn path_operator(&mut self, operation: &str, operator: &str) -> Result<&mut Self> {
        self.state.require_outside_text(operation)?;
        self.writer.write_operator(operator)?;
        Ok(self)
    }

    fn write_reals(&mut self, values: &[f32], operator: &str) -> Result<&mut Self> {
        self.writer.write_reals(values)?;
        self.writer.write_operator(operator)?;
        Ok(self)
    }

    fn color_space_name(&mut self, cs: &ColorSpace) -> String {
        if cs.has_fixed_name() {
            cs.name().to_string()
        } else {
            self.resources.add(cs)
        }
    }
}

fn check_component_count(color: &PdColor) -> Result<()> {
    let expected = color.color_space().components();
    if color.components().len() != expected {
        return Err(Error::Format(format!(
            "{} color needs {} components, got {}",
            color.color_space().name(),
            expected,
            color.components().len()
        )));
    }
    Ok(())
}

fn scale_255(values: &[i32], what: &str) -> Result<Vec<f32>> {
    values
        .iter()
        .map(|&v| {
            if (0..=255).contains(&v) {
                Ok(v as f32 / 255.0)
            } else {
                Err(Error::UnsupportedValue(format!(
                    "{} component {} is outside 0..255",
                    what, v
                )))
            }
        })
        .collect()
}

fn check_unit(values: &[f32], what: &str) -> Result<()> {
    match values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        Some(v) => Err(Error::UnsupportedValue(format!(
            "{} component {} is outside 0..1",
            what, v
        ))),
        None => Ok(()),
    }
}
