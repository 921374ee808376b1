//! Tests for drawing into a canvas.

use std::time::Duration;

use treeview::{
    Buffer, Canvas, CanvasError, Cell, Options, Rect, Rgb, TreeNode, Treeview, TreeviewError,
};

fn sample() -> Vec<TreeNode> {
    vec![TreeNode::new("Root").children(
        (1..=3).map(|i| TreeNode::new(format!("Child{i}"))),
    )]
}

fn rows(buffer: &Buffer) -> Vec<String> {
    (0..buffer.height())
        .map(|y| buffer.row_text(y).trim_end().to_string())
        .collect()
}

/// A sink whose writes always fail.
struct BrokenCanvas;

impl Canvas for BrokenCanvas {
    fn set_cell(&mut self, _x: u16, _y: u16, _cell: Cell) -> Result<(), CanvasError> {
        Err(CanvasError::Backend("terminal went away".into()))
    }

    fn clear(&mut self) -> Result<(), CanvasError> {
        Ok(())
    }

    fn area(&self) -> Rect {
        Rect::from_size(10, 3)
    }
}

// =============================================================================
// Rows
// =============================================================================

#[tokio::test]
async fn test_draws_indented_rows_with_icons() {
    let roots = vec![TreeNode::new("Root").children([
        TreeNode::new("Branch").child(TreeNode::new("Deep")),
        TreeNode::new("Leaf"),
    ])];
    let tree = Treeview::new(roots, Options::default()).unwrap();
    let mut buffer = Buffer::new(20, 4);
    tree.draw(&mut buffer, Rect::from_size(20, 4)).unwrap();

    assert_eq!(rows(&buffer), ["▼ Root", "  ▶ Branch", "  → Leaf", ""]);
}

#[tokio::test]
async fn test_custom_icons_and_indentation() {
    let options = Options::default().indentation(4).icons("-", "+", "*");
    let roots = vec![TreeNode::new("a").children([TreeNode::new("b").child(TreeNode::new("c"))])];
    let tree = Treeview::new(roots, options).unwrap();
    tree.expand("a/b");
    let mut buffer = Buffer::new(20, 3);
    tree.draw(&mut buffer, Rect::from_size(20, 3)).unwrap();

    assert_eq!(rows(&buffer), ["- a", "    - b", "        * c"]);
}

#[tokio::test]
async fn test_selected_row_uses_selected_colors() {
    let options = Options::default().label_color(Rgb::new(0, 200, 0));
    let tree = Treeview::new(sample(), options).unwrap();
    tree.next();
    let mut buffer = Buffer::new(20, 4);
    tree.draw(&mut buffer, Rect::from_size(20, 4)).unwrap();

    let selected = buffer.get(2, 1).unwrap();
    assert_eq!((selected.fg, selected.bg), (Rgb::BLACK, Rgb::WHITE));
    let plain = buffer.get(0, 0).unwrap();
    assert_eq!(plain.fg, Rgb::new(0, 200, 0));
    // Only the drawn text is highlighted.
    assert_eq!(buffer.get(15, 1).unwrap().bg, Rgb::BLACK);
}

#[tokio::test]
async fn test_long_labels_are_clipped_without_truncation() {
    let roots = vec![TreeNode::new("ThisIsAVeryLongLabel")];
    let tree = Treeview::new(roots, Options::default()).unwrap();
    let mut buffer = Buffer::new(10, 3);
    tree.draw(&mut buffer, Rect::from_size(10, 3)).unwrap();
    assert_eq!(buffer.row_text(0), "→ ThisIsAV");
}

#[tokio::test]
async fn test_truncation_fits_available_width() {
    let roots = vec![TreeNode::new("Root").children([
        TreeNode::new("ThisIsAVeryLongLabel"),
        TreeNode::new("Short"),
    ])];
    let tree = Treeview::new(roots, Options::default().truncate(true)).unwrap();

    for width in 4..=24u16 {
        let mut buffer = Buffer::new(width, 3);
        tree.draw(&mut buffer, Rect::from_size(width, 3)).unwrap();
        let long = buffer.row_text(1);
        let drawn = long.trim_end();
        assert!(treeview::text::display_width(drawn) <= width as usize, "width {width}");
        if width < 24 {
            assert!(drawn.ends_with('…'), "width {width}: {drawn}");
        } else {
            assert_eq!(drawn, "  → ThisIsAVeryLongLabel");
        }
        if width >= 9 {
            assert_eq!(buffer.row_text(2).trim_end(), "  → Short");
        }
    }
}

#[tokio::test]
async fn test_joined_emoji_label_truncates_within_width() {
    let family = "👨\u{200d}👩\u{200d}👧";
    let roots = vec![TreeNode::new(format!("{family}{family}"))];
    let tree = Treeview::new(roots, Options::default().truncate(true)).unwrap();
    let mut buffer = Buffer::new(8, 1);
    tree.draw(&mut buffer, Rect::from_size(8, 1)).unwrap();

    let row = buffer.row_text(0);
    assert_eq!(row.trim_end(), "→ 👨👩…");
    assert!(treeview::text::display_width(&row) <= 8);
}

#[tokio::test]
async fn test_wide_characters_take_two_cells() {
    let roots = vec![TreeNode::new("日本")];
    let tree = Treeview::new(roots, Options::default()).unwrap();
    let mut buffer = Buffer::new(10, 3);
    tree.draw(&mut buffer, Rect::from_size(10, 3)).unwrap();

    assert_eq!(buffer.get(2, 0).unwrap().char, '日');
    assert!(buffer.get(3, 0).unwrap().wide_continuation);
    assert_eq!(buffer.get(4, 0).unwrap().char, '本');
    assert_eq!(buffer.row_text(0).trim_end(), "→ 日本");
}

// =============================================================================
// Scroll indicators
// =============================================================================

#[tokio::test]
async fn test_indicators_drawn_over_rows() {
    let tree = Treeview::new(sample(), Options::default()).unwrap();
    let mut buffer = Buffer::new(20, 2);
    tree.draw(&mut buffer, Rect::from_size(20, 2)).unwrap();
    assert_eq!(rows(&buffer), ["▼ Root", "↓ → Child1"]);

    tree.scroll_by(2);
    tree.draw(&mut buffer, Rect::from_size(20, 2)).unwrap();
    assert_eq!(rows(&buffer), ["↑ → Child2", "  → Child3"]);
}

#[tokio::test]
async fn test_indicators_use_indicator_color() {
    let options = Options::default().indicator_color(Rgb::new(255, 165, 0));
    let tree = Treeview::new(sample(), options).unwrap();
    let mut buffer = Buffer::new(20, 2);
    tree.draw(&mut buffer, Rect::from_size(20, 2)).unwrap();

    let arrow = buffer.get(0, 1).unwrap();
    assert_eq!(arrow.char, '↓');
    assert_eq!(arrow.fg, Rgb::new(255, 165, 0));
    assert_eq!(buffer.get(2, 1).unwrap().fg, Rgb::WHITE);
}

#[tokio::test]
async fn test_no_indicators_when_everything_fits() {
    let tree = Treeview::new(sample(), Options::default()).unwrap();
    let mut buffer = Buffer::new(20, 6);
    tree.draw(&mut buffer, Rect::from_size(20, 6)).unwrap();
    let text = rows(&buffer).join("\n");
    assert!(!text.contains('↑'));
    assert!(!text.contains('↓'));
}

// =============================================================================
// Target area
// =============================================================================

#[tokio::test]
async fn test_draw_stays_inside_target() {
    let tree = Treeview::new(sample(), Options::default()).unwrap();
    let mut buffer = Buffer::new(20, 6);
    for y in 0..6 {
        for x in 0..20 {
            buffer.set_cell(x, y, Cell::new('#')).unwrap();
        }
    }
    tree.draw(&mut buffer, Rect::new(4, 1, 8, 2)).unwrap();

    assert_eq!(buffer.row_text(0), "#".repeat(20));
    assert_eq!(buffer.row_text(1), "####▼ Root  ########");
    assert_eq!(buffer.row_text(2), "####↓ → Chil########");
    assert_eq!(buffer.row_text(3), "#".repeat(20));
}

#[tokio::test]
async fn test_target_is_clipped_to_canvas() {
    let tree = Treeview::new(sample(), Options::default()).unwrap();
    let mut buffer = Buffer::new(10, 3);
    tree.draw(&mut buffer, Rect::new(0, 1, 40, 40)).unwrap();
    assert_eq!(buffer.row_text(0).trim_end(), "");
    assert_eq!(buffer.row_text(1).trim_end(), "▼ Root");
    assert!(tree.scroll_indicators().down);
}

#[tokio::test]
async fn test_target_outside_canvas_is_too_small() {
    let tree = Treeview::new(sample(), Options::default()).unwrap();
    let mut buffer = Buffer::new(10, 3);
    let err = tree.draw(&mut buffer, Rect::new(20, 20, 5, 5)).unwrap_err();
    assert!(matches!(err, TreeviewError::CanvasTooSmall { .. }));
    let err = tree.draw(&mut buffer, Rect::new(0, 0, 0, 3)).unwrap_err();
    assert!(matches!(err, TreeviewError::CanvasTooSmall { .. }));
}

#[tokio::test]
async fn test_sink_errors_pass_through() {
    let tree = Treeview::new(sample(), Options::default()).unwrap();
    let err = tree.draw(&mut BrokenCanvas, Rect::from_size(10, 3)).unwrap_err();
    assert!(matches!(err, TreeviewError::Canvas(CanvasError::Backend(_))));
    assert_eq!(err.to_string(), "canvas backend error: terminal went away");
}

#[tokio::test]
async fn test_minimum_size_hint() {
    let tree = Treeview::new(sample(), Options::default()).unwrap();
    assert_eq!(tree.minimum_size(), (10, 3));
}

// =============================================================================
// Spinner
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_busy_leaf_shows_spinner_frame() {
    let roots = vec![TreeNode::new("Job").on_activate(|| async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok(())
    })];
    let tree = Treeview::new(roots, Options::default()).unwrap();
    let mut buffer = Buffer::new(10, 3);

    tree.activate("Job");
    tree.draw(&mut buffer, Rect::from_size(10, 3)).unwrap();
    assert_eq!(buffer.row_text(0).trim_end(), "◐ Job");

    tokio::time::sleep(Duration::from_millis(250)).await;
    tree.draw(&mut buffer, Rect::from_size(10, 3)).unwrap();
    assert_eq!(buffer.row_text(0).trim_end(), "◓ Job");

    tokio::time::sleep(Duration::from_secs(1)).await;
    tree.draw(&mut buffer, Rect::from_size(10, 3)).unwrap();
    assert_eq!(buffer.row_text(0).trim_end(), "→ Job");
}

#[tokio::test(start_paused = true)]
async fn test_empty_frames_keep_the_leaf_icon() {
    let roots = vec![TreeNode::new("Job").on_activate(|| async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok(())
    })];
    let options = Options::default().spinner_frames(Vec::<String>::new());
    let tree = Treeview::new(roots, options).unwrap();
    let mut buffer = Buffer::new(10, 3);

    tree.activate("Job");
    assert!(tree.is_busy("Job"));
    tree.draw(&mut buffer, Rect::from_size(10, 3)).unwrap();
    assert_eq!(buffer.row_text(0).trim_end(), "→ Job");
}
