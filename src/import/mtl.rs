//! MTL-family material parser.
//!
//! Recognized keys: `Ka`, `Kd`, `Ks` (3-float colors), `Ns` (specular
//! exponent), `map_Kd` and `map_Bump` (image references). Unknown keys are
//! ignored; malformed lines are reported and skipped. Map paths are left
//! as written here and resolved against the MTL file's directory by the
//! scene builder.

use log::warn;

use crate::import::ImportIssue;

/// Parsed material statement values, with the format's defaults filled in.
#[derive(Debug, Clone)]
pub struct MtlImport {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    /// `map_Kd` image reference, relative to the MTL file.
    pub diffuse_map: Option<String>,
    /// `map_Bump` image reference, relative to the MTL file.
    pub normal_map: Option<String>,
    pub issues: Vec<ImportIssue>,
}

impl Default for MtlImport {
    fn default() -> Self {
        Self {
            ambient: [1.0, 1.0, 1.0],
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
            shininess: 32.0,
            diffuse_map: None,
            normal_map: None,
            issues: Vec::new(),
        }
    }
}

/// Parses MTL text. Never fails; problems land in `issues`.
pub fn parse_mtl(text: &str) -> MtlImport {
    let mut import = MtlImport::default();

    for (line_index, raw_line) in text.lines().enumerate() {
        let line_number = line_index + 1;
        let line = raw_line.trim_end_matches('\r');
        let tokens: Vec<&str> = line.split(' ').collect();

        match tokens[0] {
            "Ka" => match parse_color(&tokens) {
                Some(color) => import.ambient = color,
                None => import.report(line_number, line),
            },
            "Kd" => match parse_color(&tokens) {
                Some(color) => import.diffuse = color,
                None => import.report(line_number, line),
            },
            "Ks" => match parse_color(&tokens) {
                Some(color) => import.specular = color,
                None => import.report(line_number, line),
            },
            "Ns" => match parse_exponent(&tokens) {
                Some(value) => import.shininess = value,
                None => import.report(line_number, line),
            },
            "map_Kd" if tokens.len() == 2 => {
                import.diffuse_map = Some(tokens[1].to_string());
            }
            "map_Bump" if tokens.len() == 2 => {
                import.normal_map = Some(tokens[1].to_string());
            }
            _ => {}
        }
    }

    import
}

impl MtlImport {
    fn report(&mut self, line: usize, text: &str) {
        let issue = ImportIssue::MalformedLine {
            line,
            text: text.to_string(),
        };
        warn!("mtl import: {}", issue);
        self.issues.push(issue);
    }
}

fn parse_color(tokens: &[&str]) -> Option<[f32; 3]> {
    if tokens.len() != 4 {
        return None;
    }
    Some([
        tokens[1].parse().ok()?,
        tokens[2].parse().ok()?,
        tokens[3].parse().ok()?,
    ])
}

fn parse_exponent(tokens: &[&str]) -> Option<f32> {
    if tokens.len() != 2 {
        return None;
    }
    tokens[1].parse().ok()
}
