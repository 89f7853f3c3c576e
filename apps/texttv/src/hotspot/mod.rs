//! Hotspot index: clickable rectangles over a page bitmap.
//!
//! The descriptor is image-map markup; only `COORDS="x1,y1,x2,y2" HREF="n"` pairs
//! matter, in the order they appear. A pair that does not have four integer
//! coordinates and an integer target is skipped without failing the rest.

const COORDS_OPEN: &str = "COORDS=\"";
const HREF_OPEN: &str = " HREF=\"";

/// Axis-aligned region mapping to a target page. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotspotRegion {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub target_page: u32,
}

impl HotspotRegion {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }
}

/// Regions of one subpage in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotspotIndex {
    regions: Vec<HotspotRegion>,
}

impl HotspotIndex {
    pub fn parse(descriptor: &str) -> Self {
        let mut regions = Vec::new();
        let mut rest = descriptor;

        while let Some(start) = rest.find(COORDS_OPEN) {
            rest = &rest[start + COORDS_OPEN.len()..];
            if let Some((region, consumed)) = parse_entry(rest) {
                regions.push(region);
                rest = &rest[consumed..];
            }
        }

        Self { regions }
    }

    #[cfg(test)]
    pub fn regions(&self) -> &[HotspotRegion] {
        &self.regions
    }

    /// Region under the point. Later regions cover earlier ones.
    pub fn hover(&self, x: u32, y: u32) -> Option<&HotspotRegion> {
        self.regions.iter().rev().find(|r| r.contains(x, y))
    }

    /// Target of a click: the same region `hover` reports.
    pub fn resolve_click(&self, x: u32, y: u32) -> Option<u32> {
        self.hover(x, y).map(|r| r.target_page)
    }
}

/// Parses `x1,y1,x2,y2" HREF="n"` at the start of `input`.
/// Returns the region and the number of bytes consumed.
fn parse_entry(input: &str) -> Option<(HotspotRegion, usize)> {
    let coords_end = input.find('"')?;
    let coords = &input[..coords_end];

    let after_coords = &input[coords_end..];
    let href = after_coords.strip_prefix('"')?.strip_prefix(HREF_OPEN)?;
    let href_end = href.find('"')?;
    let target = &href[..href_end];

    let numbers = coords
        .split(',')
        .map(parse_number)
        .collect::<Option<Vec<u32>>>()?;
    let [x1, y1, x2, y2] = numbers[..] else {
        return None;
    };
    let target_page = parse_number(target).filter(|&p| p > 0)?;
    if x1 > x2 || y1 > y2 {
        return None;
    }

    let consumed = input.len() - href.len() + href_end + 1;
    Some((
        HotspotRegion {
            x1,
            y1,
            x2,
            y2,
            target_page,
        },
        consumed,
    ))
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERLAPPING: &str = r#"COORDS="1,1,10,10" HREF="101" COORDS="5,5,20,20" HREF="102""#;

    #[test]
    fn test_parse_keeps_descriptor_order() {
        let index = HotspotIndex::parse(OVERLAPPING);
        assert_eq!(
            index.regions(),
            &[
                HotspotRegion {
                    x1: 1,
                    y1: 1,
                    x2: 10,
                    y2: 10,
                    target_page: 101,
                },
                HotspotRegion {
                    x1: 5,
                    y1: 5,
                    x2: 20,
                    y2: 20,
                    target_page: 102,
                },
            ]
        );
    }

    #[test]
    fn test_click_in_overlap_resolves_to_last_region() {
        let index = HotspotIndex::parse(OVERLAPPING);
        assert_eq!(index.resolve_click(7, 7), Some(102));
        assert_eq!(index.resolve_click(2, 2), Some(101));
        assert_eq!(index.resolve_click(30, 30), None);
    }

    #[test]
    fn test_hover_in_overlap_agrees_with_click() {
        let index = HotspotIndex::parse(OVERLAPPING);
        for (x, y) in [(7, 7), (2, 2), (15, 15), (0, 0)] {
            assert_eq!(index.hover(x, y).map(|r| r.target_page), index.resolve_click(x, y));
        }
        assert_eq!(index.hover(7, 7).map(|r| r.target_page), Some(102));
        assert!(index.hover(0, 0).is_none());
    }

    #[test]
    fn test_edges_are_inclusive() {
        let index = HotspotIndex::parse(OVERLAPPING);
        assert_eq!(index.resolve_click(1, 1), Some(101));
        assert_eq!(index.resolve_click(20, 20), Some(102));
        assert_eq!(index.resolve_click(21, 20), None);
    }

    #[test]
    fn test_parse_real_image_map_markup() {
        let markup = r#"<MAP NAME="map"><AREA SHAPE="RECT" COORDS="26,16,52,31" HREF="101" ALT="Inrikes"><AREA SHAPE="RECT" COORDS="26,32,52,47" HREF="104" ALT="Utrikes"></MAP>"#;
        let index = HotspotIndex::parse(markup);
        assert_eq!(index.regions().len(), 2);
        assert_eq!(index.resolve_click(30, 40), Some(104));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let markup = concat!(
            r#"COORDS="1,2,3" HREF="101" "#,
            r#"COORDS="a,b,c,d" HREF="102" "#,
            r#"COORDS="1,1,5,5" HREF="x" "#,
            r#"COORDS="1,1,5,5" HREF="103""#,
        );
        let index = HotspotIndex::parse(markup);
        assert_eq!(index.regions().len(), 1);
        assert_eq!(index.regions()[0].target_page, 103);
    }

    #[test]
    fn test_reversed_corners_are_skipped() {
        let markup = r#"COORDS="10,10,1,1" HREF="200" COORDS="1,10,10,1" HREF="201" COORDS="1,1,10,10" HREF="202""#;
        let index = HotspotIndex::parse(markup);
        assert_eq!(index.regions().len(), 1);
        assert_eq!(index.resolve_click(5, 5), Some(202));
    }

    #[test]
    fn test_empty_descriptor_has_no_regions() {
        assert!(HotspotIndex::parse("").regions().is_empty());
        assert!(HotspotIndex::parse("<MAP></MAP>").regions().is_empty());
    }
}
