//! Anchor clustering
//!
//! Trading-card titles are printed at the top-left of the card face. The
//! top-left-most observation is taken as the anchor and every observation
//! whose box overlaps it is presumed to belong to the title region - an
//! approximation that avoids a full text-layout model.

use super::Observation;

/// Select the presumed title-bearing cluster: the anchor (first element under
/// the lexicographic `(y, x)` order on box origins) plus every observation
/// whose box overlaps the anchor's.
///
/// Observations tying exactly on `(y, x)` keep their insertion order (stable
/// sort). The anchor appears first in the result; empty input yields empty
/// output.
pub fn anchor_cluster(observations: &[Observation]) -> Vec<Observation> {
    let mut ordered: Vec<&Observation> = observations.iter().collect();
    ordered.sort_by(|a, b| {
        a.bounds
            .y
            .total_cmp(&b.bounds.y)
            .then(a.bounds.x.total_cmp(&b.bounds.x))
    });

    let Some(anchor) = ordered.first().copied() else {
        return Vec::new();
    };

    let mut cluster = vec![anchor.clone()];
    cluster.extend(
        ordered[1..]
            .iter()
            .filter(|o| anchor.bounds.intersects(&o.bounds))
            .map(|o| (*o).clone()),
    );
    cluster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::Rect;

    fn obs(text: &str, x: f32, y: f32, w: f32, h: f32) -> Observation {
        Observation::new(text, Rect::new(x, y, w, h))
    }

    #[test]
    fn test_empty_input() {
        assert!(anchor_cluster(&[]).is_empty());
    }

    #[test]
    fn test_single_observation_is_its_own_cluster() {
        let cluster = anchor_cluster(&[obs("title", 10.0, 10.0, 100.0, 20.0)]);
        assert_eq!(cluster.len(), 1);
        assert_eq!(cluster[0].text, "title");
    }

    #[test]
    fn test_anchor_is_topmost_then_leftmost() {
        // "body" is leftmost but lower; "title" is higher, so y wins
        let observations = vec![
            obs("body", 0.0, 50.0, 100.0, 20.0),
            obs("title", 40.0, 5.0, 100.0, 20.0),
        ];

        let cluster = anchor_cluster(&observations);
        assert_eq!(cluster[0].text, "title");
    }

    #[test]
    fn test_x_breaks_y_ties() {
        let observations = vec![
            obs("right", 60.0, 10.0, 40.0, 20.0),
            obs("left", 10.0, 10.0, 40.0, 20.0),
        ];

        let cluster = anchor_cluster(&observations);
        assert_eq!(cluster[0].text, "left");
    }

    #[test]
    fn test_exact_ties_keep_insertion_order() {
        let observations = vec![
            obs("first", 10.0, 10.0, 40.0, 20.0),
            obs("second", 10.0, 10.0, 40.0, 20.0),
        ];

        let cluster = anchor_cluster(&observations);
        assert_eq!(cluster[0].text, "first");
    }

    #[test]
    fn test_cluster_selects_overlapping_boxes_only() {
        let observations = vec![
            obs("title", 10.0, 10.0, 100.0, 20.0),
            // Overlaps the anchor box
            obs("title again", 15.0, 12.0, 100.0, 20.0),
            // Well below the anchor, no overlap
            obs("rules text", 10.0, 200.0, 100.0, 20.0),
        ];

        let cluster = anchor_cluster(&observations);
        let texts: Vec<_> = cluster.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["title", "title again"]);
    }

    #[test]
    fn test_anchor_included_exactly_once() {
        let observations = vec![
            obs("title", 10.0, 10.0, 100.0, 20.0),
            obs("overlap", 20.0, 15.0, 50.0, 10.0),
        ];

        let cluster = anchor_cluster(&observations);
        let anchors = cluster.iter().filter(|o| o.text == "title").count();
        assert_eq!(anchors, 1);
    }

    #[test]
    fn test_edge_touching_box_is_not_in_cluster() {
        let observations = vec![
            obs("title", 10.0, 10.0, 100.0, 20.0),
            // Shares only the bottom edge of the anchor
            obs("subtitle", 10.0, 30.0, 100.0, 20.0),
        ];

        let cluster = anchor_cluster(&observations);
        assert_eq!(cluster.len(), 1);
    }
}
