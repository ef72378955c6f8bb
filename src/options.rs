//! Processing options posted alongside the image.

/// Quality sent when the slider has never been touched. Matches the
/// server-side default.
pub const DEFAULT_QUALITY: u8 = 85;

/// Unit the width/height fields are expressed in. The server converts
/// physical units to pixels at 96 DPI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DimensionUnit {
    #[default]
    Px,
    In,
    Cm,
}

impl DimensionUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DimensionUnit::Px => "px",
            DimensionUnit::In => "in",
            DimensionUnit::Cm => "cm",
        }
    }

    /// Maps a select-box value; anything unrecognized falls back to pixels.
    pub fn from_value(value: &str) -> Self {
        match value {
            "in" => DimensionUnit::In,
            "cm" => DimensionUnit::Cm,
            _ => DimensionUnit::Px,
        }
    }
}

/// Unit the target-size field is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeUnit {
    #[default]
    Kb,
    Mb,
}

impl SizeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnit::Kb => "kb",
            SizeUnit::Mb => "mb",
        }
    }

    pub fn from_value(value: &str) -> Self {
        match value {
            "mb" => SizeUnit::Mb,
            _ => SizeUnit::Kb,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub unit: DimensionUnit,
    pub target_size: Option<f64>,
    pub target_size_unit: SizeUnit,
    pub quality: u8,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            unit: DimensionUnit::default(),
            target_size: None,
            target_size_unit: SizeUnit::default(),
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ProcessOptions {
    /// A positive target size makes the server ignore the quality field,
    /// so the quality controls are greyed out while this holds.
    pub fn size_overrides_quality(&self) -> bool {
        self.target_size.is_some_and(|size| size > 0.0)
    }

    /// String fields for the multipart payload, in submission order.
    /// Width, height and target size are omitted when unset; the server
    /// treats a missing value and an unparseable one the same way. The
    /// quality is always sent, even while the target size overrides it,
    /// and the server decides which of the two applies.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(width) = self.width {
            fields.push(("width", width.to_string()));
        }
        if let Some(height) = self.height {
            fields.push(("height", height.to_string()));
        }
        fields.push(("unit", self.unit.as_str().to_string()));
        if let Some(size) = self.target_size {
            fields.push(("target_size", size.to_string()));
        }
        fields.push(("target_size_unit", self.target_size_unit.as_str().to_string()));
        fields.push(("quality", self.quality.to_string()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_send_only_the_always_on_fields() {
        let fields = ProcessOptions::default().form_fields();
        assert_eq!(
            fields,
            vec![
                ("unit", "px".to_string()),
                ("target_size_unit", "kb".to_string()),
                ("quality", "85".to_string()),
            ]
        );
    }

    #[test]
    fn filled_options_send_every_field_in_order() {
        let options = ProcessOptions {
            width: Some(800),
            height: Some(600),
            unit: DimensionUnit::Cm,
            target_size: Some(250.0),
            target_size_unit: SizeUnit::Mb,
            quality: 70,
        };
        assert_eq!(
            options.form_fields(),
            vec![
                ("width", "800".to_string()),
                ("height", "600".to_string()),
                ("unit", "cm".to_string()),
                ("target_size", "250".to_string()),
                ("target_size_unit", "mb".to_string()),
                ("quality", "70".to_string()),
            ]
        );
    }

    #[test]
    fn fractional_target_size_keeps_its_decimals() {
        let options = ProcessOptions {
            target_size: Some(1.5),
            ..ProcessOptions::default()
        };
        let fields = options.form_fields();
        assert!(fields.contains(&("target_size", "1.5".to_string())));
    }

    #[test]
    fn only_a_positive_target_size_overrides_quality() {
        let mut options = ProcessOptions::default();
        assert!(!options.size_overrides_quality());
        options.target_size = Some(0.0);
        assert!(!options.size_overrides_quality());
        options.target_size = Some(120.0);
        assert!(options.size_overrides_quality());
    }

    #[test]
    fn select_values_fall_back_to_defaults() {
        assert_eq!(DimensionUnit::from_value("in"), DimensionUnit::In);
        assert_eq!(DimensionUnit::from_value("cm"), DimensionUnit::Cm);
        assert_eq!(DimensionUnit::from_value("furlong"), DimensionUnit::Px);
        assert_eq!(SizeUnit::from_value("mb"), SizeUnit::Mb);
        assert_eq!(SizeUnit::from_value(""), SizeUnit::Kb);
    }
}
