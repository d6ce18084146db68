/// Integer size measured in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Per-edge pixel amounts in CSS order (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.top == self.bottom && self.top == self.left
    }

    /// CSS shorthand, collapsed to a single value when all edges agree.
    ///
    /// Returns `None` for all-zero sides so callers can omit the property.
    pub fn to_css(&self) -> Option<String> {
        if self.is_uniform() {
            if self.top == 0 {
                return None;
            }
            return Some(px(self.top));
        }
        Some(format!(
            "{} {} {} {}",
            px(self.top),
            px(self.right),
            px(self.bottom),
            px(self.left)
        ))
    }

    /// Parses the shorthand produced by [`Sides::to_css`] (one, two or four values).
    pub fn parse_css(value: &str) -> Option<Self> {
        let parts: Option<Vec<i32>> = value.split_whitespace().map(parse_px).collect();
        match parts?.as_slice() {
            [all] => Some(Self::uniform(*all)),
            [v, h] => Some(Self::new(*v, *h, *v, *h)),
            [t, h, b] => Some(Self::new(*t, *h, *b, *h)),
            [t, r, b, l] => Some(Self::new(*t, *r, *b, *l)),
            _ => None,
        }
    }
}

pub fn px(value: i32) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("{value}px")
    }
}

/// Parses `12px` or a bare `0`; anything else yields `None`.
pub fn parse_px(value: &str) -> Option<i32> {
    let value = value.trim();
    if value == "0" {
        return Some(0);
    }
    value.strip_suffix("px")?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sides_collapse_to_single_value() {
        assert_eq!(Sides::uniform(4).to_css().as_deref(), Some("4px"));
        assert_eq!(Sides::uniform(0).to_css(), None);
    }

    #[test]
    fn mixed_sides_emit_four_values() {
        let sides = Sides::new(9, 0, 3, 5);
        assert_eq!(sides.to_css().as_deref(), Some("9px 0 3px 5px"));
        assert_eq!(Sides::parse_css("9px 0 3px 5px"), Some(sides));
    }

    #[test]
    fn parse_px_rejects_percentages() {
        assert_eq!(parse_px("12px"), Some(12));
        assert_eq!(parse_px("0"), Some(0));
        assert_eq!(parse_px("50%"), None);
    }
}
