/// Last known position of an identity relative to the counting boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Not yet seen outside the band
    #[default]
    Unknown,
    /// Smaller y than the boundary (towards the top of the frame)
    Above,
    /// Larger y than the boundary
    Below,
}
