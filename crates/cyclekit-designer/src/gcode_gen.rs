//! G-code generation from toolpaths.

use crate::toolpath::{Toolpath, ToolpathSegment, ToolpathSegmentType};

/// G-code generator for converting toolpaths to G-code commands.
#[derive(Debug, Clone)]
pub struct ToolpathToGcode {
    /// Safe Z height for rapid moves between passes
    pub safe_z: f64,
    line_numbers_enabled: bool,
    return_to_origin: bool,
}

impl ToolpathToGcode {
    /// Creates a new G-code generator.
    pub fn new(safe_z: f64) -> Self {
        Self {
            safe_z,
            line_numbers_enabled: false,
            return_to_origin: true,
        }
    }

    /// Enables or disables `N` line numbers on motion lines.
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers_enabled = enabled;
        self
    }

    /// Enables or disables the final rapid back to X0 Y0.
    pub fn with_return_to_origin(mut self, enabled: bool) -> Self {
        self.return_to_origin = enabled;
        self
    }

    /// Generates G-code from a toolpath.
    pub fn generate(
        &self,
        toolpath: &Toolpath,
        title: &str,
        feed_rate: f64,
        spindle_speed: u32,
    ) -> String {
        let mut gcode = self.generate_header(
            title,
            spindle_speed,
            feed_rate,
            toolpath.tool_diameter,
            toolpath.depth,
            toolpath.total_length(),
        );
        gcode.push_str(&self.generate_body(toolpath, 10));
        gcode.push_str(&self.generate_footer());
        gcode
    }

    /// Generates the comment block that opens every program.
    pub fn generate_comments(
        &self,
        title: &str,
        feed_rate: f64,
        tool_diameter: f64,
        depth: f64,
    ) -> String {
        let mut gcode = String::new();
        gcode.push_str(&format!("; Contour toolpath for {}\n", title));
        gcode.push_str(&format!("; Tool diameter: {:.3}mm\n", tool_diameter));
        gcode.push_str(&format!("; Cut depth: {:.3}mm\n", depth));
        gcode.push_str(&format!("; Feed rate: {:.0} mm/min\n", feed_rate));
        gcode
    }

    /// Generates the G-code header.
    pub fn generate_header(
        &self,
        title: &str,
        spindle_speed: u32,
        feed_rate: f64,
        tool_diameter: f64,
        depth: f64,
        total_length: f64,
    ) -> String {
        let mut gcode = self.generate_comments(title, feed_rate, tool_diameter, depth);
        gcode.push_str(&format!("; Spindle speed: {} RPM\n", spindle_speed));
        gcode.push_str(&format!("; Total path length: {:.3}mm\n", total_length));
        gcode.push('\n');

        // Setup
        gcode.push_str("G90         ; Absolute positioning\n");
        gcode.push_str("G21         ; Millimeter units\n");
        gcode.push_str("G17         ; XY plane\n");
        gcode.push_str(&format!(
            "M3 S{}      ; Spindle on at {} RPM\n",
            spindle_speed, spindle_speed
        ));
        gcode.push_str(&format!("G00 Z{:.3}   ; Move to safe height\n", self.safe_z));
        gcode.push('\n');
        gcode
    }

    /// Generates the G-code body (moves) for a toolpath.
    pub fn generate_body(&self, toolpath: &Toolpath, start_line_number: u32) -> String {
        let mut gcode = String::new();
        let mut line_number = start_line_number;

        for segment in &toolpath.segments {
            let line_prefix = if self.line_numbers_enabled {
                format!("N{} ", line_number)
            } else {
                String::new()
            };
            gcode.push_str(&line_prefix);
            gcode.push_str(&Self::segment_line(segment));
            gcode.push('\n');
            line_number += 10;
        }
        gcode
    }

    fn segment_line(segment: &ToolpathSegment) -> String {
        let end = segment.end;
        match segment.segment_type {
            ToolpathSegmentType::RapidMove => format!("G00 X{:.3} Y{:.3}", end.x, end.y),
            ToolpathSegmentType::Retract => format!("G00 Z{:.3}", segment.z),
            ToolpathSegmentType::Plunge => {
                format!("G01 Z{:.3} F{:.0}", segment.z, segment.feed_rate)
            }
            ToolpathSegmentType::LinearMove => {
                format!("G01 X{:.3} Y{:.3} F{:.0}", end.x, end.y, segment.feed_rate)
            }
            ToolpathSegmentType::ArcCW | ToolpathSegmentType::ArcCCW => {
                let cmd = if segment.segment_type == ToolpathSegmentType::ArcCW {
                    "G02"
                } else {
                    "G03"
                };
                match segment.center {
                    Some(center) => {
                        let i = center.x - segment.start.x;
                        let j = center.y - segment.start.y;
                        format!(
                            "{} X{:.3} Y{:.3} I{:.3} J{:.3} F{:.0}",
                            cmd, end.x, end.y, i, j, segment.feed_rate
                        )
                    }
                    None => format!("G01 X{:.3} Y{:.3} F{:.0}", end.x, end.y, segment.feed_rate),
                }
            }
        }
    }

    /// Generates the G-code footer.
    pub fn generate_footer(&self) -> String {
        let mut gcode = String::new();
        gcode.push('\n');
        gcode.push_str("M5          ; Spindle off\n");
        gcode.push_str(&format!("G00 Z{:.3}   ; Raise tool to safe height\n", self.safe_z));
        if self.return_to_origin {
            gcode.push_str("G00 X0 Y0   ; Return to origin\n");
        }
        gcode.push_str("M30         ; End program\n");
        gcode
    }
}

impl Default for ToolpathToGcode {
    fn default() -> Self {
        Self::new(5.0)
    }
}
