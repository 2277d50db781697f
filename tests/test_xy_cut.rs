//! Integration tests for the recursive XY-cut partitioner.

use pdf_strata::geometry::Rect;
use pdf_strata::layout::{FixedLaneCutter, HasRect, PageStatistics, TextBlockCutter, TextChar, XyCut};
use std::collections::VecDeque;

fn mock_glyph(c: char, x: f32, y: f32) -> TextChar {
    TextChar::new(c.to_string(), Rect::new(x, y, 5.0, 10.0), "Times-Roman", 10.0, 2)
}

fn glyphs(text: &str, x: f32, y: f32) -> Vec<TextChar> {
    text.chars()
        .enumerate()
        .map(|(i, c)| mock_glyph(c, x + 5.0 * i as f32, y))
        .collect()
}

#[test]
fn test_vertical_cut_at_wide_gap() {
    let cutter = FixedLaneCutter::new(10.0, 10.0);
    let rects = vec![
        Rect::new(0.0, 0.0, 30.0, 10.0),
        Rect::new(35.0, 20.0, 30.0, 10.0),
        Rect::new(120.0, 0.0, 30.0, 10.0),
    ];

    let groups = XyCut::<Rect>::cut_vertically(&cutter, rects.clone());
    assert_eq!(groups, vec![vec![rects[0], rects[1]], vec![rects[2]]]);
}

#[test]
fn test_only_first_lane_is_taken() {
    let cutter = FixedLaneCutter::new(10.0, 10.0);
    let rects = vec![
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(50.0, 0.0, 10.0, 10.0),
        Rect::new(100.0, 0.0, 10.0, 10.0),
    ];

    let groups = XyCut::<Rect>::cut_vertically(&cutter, rects);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].len(), 1);
    assert_eq!(groups[1].len(), 2);

    // The recursion finds the remaining lane
    assert_eq!(XyCut::<Rect>::cut(&cutter, groups[1].clone()).len(), 2);
}

#[test]
fn test_horizontal_cut() {
    let cutter = FixedLaneCutter::new(10.0, 10.0);
    let rects = vec![
        Rect::new(0.0, 100.0, 50.0, 10.0),
        Rect::new(0.0, 0.0, 50.0, 10.0),
        Rect::new(0.0, 14.0, 50.0, 10.0),
    ];

    let groups = XyCut::<Rect>::cut_horizontally(&cutter, rects);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].iter().map(|r| r.y).collect::<Vec<_>>(), vec![0.0, 14.0]);
    assert_eq!(groups[1][0].y, 100.0);
}

#[test]
fn test_atoms_are_leaves() {
    let cutter = FixedLaneCutter::new(10.0, 10.0);
    assert!(XyCut::<Rect>::cut(&cutter, Vec::new()).is_empty());
    assert!(XyCut::<Rect>::cut_vertically(&cutter, Vec::new()).is_empty());

    let single = vec![Rect::new(3.0, 4.0, 5.0, 6.0)];
    assert_eq!(XyCut::<Rect>::cut(&cutter, single.clone()), vec![single]);
}

#[test]
fn test_overlapping_boxes_stay_together() {
    let cutter = FixedLaneCutter::new(10.0, 10.0);
    let rects = vec![
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Rect::new(20.0, 20.0, 10.0, 10.0),
        Rect::new(70.0, 70.0, 10.0, 10.0),
    ];
    let blocks = XyCut::<Rect>::cut(&cutter, rects);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].len(), 3);
}

#[test]
fn test_grid_leaves_and_coverage() {
    let cutter = FixedLaneCutter::new(8.0, 8.0);
    let mut rects = Vec::new();
    for row in 0..4 {
        for col in 0..5 {
            rects.push(Rect::new(col as f32 * 40.0, row as f32 * 30.0, 20.0 + row as f32, 12.0));
        }
    }

    // A vertical slice that has no horizontal lane is a leaf and is not cut
    // vertically again, so row pieces right of a cut column stay together.
    let blocks = XyCut::<Rect>::cut(&cutter, rects.clone());
    let sizes: Vec<usize> = blocks.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![1, 1, 1, 1, 1, 3, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1]);

    let total: usize = sizes.iter().sum();
    assert_eq!(total, rects.len());

    // Row 0, columns 2..=4
    assert_eq!(blocks[5].iter().map(|r| r.x).collect::<Vec<_>>(), vec![80.0, 120.0, 160.0]);
}

/// A cutter that refuses lanes crossing a ruled line.
struct RuleAwareCutter {
    rule_x: f32,
}

impl XyCut<Rect> for RuleAwareCutter {
    type Block = Rect;

    fn lane_width(&self, _elements: &[Rect]) -> f32 {
        10.0
    }

    fn lane_height(&self, _elements: &[Rect]) -> f32 {
        10.0
    }

    fn is_valid_vertical_lane(&self, _elements: &[Rect], left: f32, right: f32, queue: &VecDeque<usize>) -> bool {
        queue.is_empty() && !(left..=right).contains(&self.rule_x)
    }

    fn wrap(&self, elements: Vec<Rect>) -> Rect {
        Rect::union_all(elements.iter()).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }
}

#[test]
fn test_custom_lane_predicate_and_leaf() {
    let rects = vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(40.0, 0.0, 10.0, 10.0)];

    let free = RuleAwareCutter { rule_x: 500.0 };
    assert_eq!(free.cut(rects.clone()).len(), 2);

    let ruled = RuleAwareCutter { rule_x: 35.0 };
    let blocks = ruled.cut(rects);
    assert_eq!(blocks, vec![Rect::new(0.0, 0.0, 50.0, 10.0)]);
}

#[test]
fn test_text_blocks_of_a_page() {
    let mut chars = glyphs("Title", 100.0, 20.0);
    chars.extend(glyphs("left", 0.0, 100.0));
    chars.extend(glyphs("column", 0.0, 112.0));
    chars.extend(glyphs("right", 200.0, 100.0));
    chars.extend(glyphs("column", 200.0, 112.0));

    let stats = PageStatistics::analyze(&chars);
    let blocks = TextBlockCutter::new(2.0).with_statistics(stats).cut(chars);

    let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["leftcolumn", "Title", "rightcolumn"]);
    for block in &blocks {
        for c in &block.chars {
            assert!(block.bbox.contains_rect(&c.rect()));
        }
    }
}
