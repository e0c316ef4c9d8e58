//! Superbox stacking.
//!
//! Boxes sharing the dimension across the stacking axis are merged into
//! strips ("superboxes") before placement, so a strip is cut out of the sheet
//! once and then separated with short secondary cuts. After placement every
//! superbox is expanded back into its boxes.

use u_guillotine_core::{Box2D, Cut, CutOrientation, StackingMode, EPSILON};

/// Merges boxes into superboxes along the stacking axis of `mode`.
///
/// `sheets` lists the usable `(length, width)` of every sheet a superbox may
/// end up in; a strip never grows beyond the longest sheet extent that can
/// hold it across. Boxes that cannot be combined are returned as they are.
/// Groups keep the order in which their first box appeared.
pub fn build_superboxes(
    boxes: Vec<Box2D>,
    mode: StackingMode,
    kerf: f64,
    sheets: &[(f64, f64)],
    rotatable: bool,
) -> Vec<Box2D> {
    let flipped = match mode {
        StackingMode::None => return boxes,
        StackingMode::AlongLength => false,
        StackingMode::AlongWidth => true,
    };

    // Width stacking works in a flipped frame where the strip grows along
    // length, against sheets with swapped extents.
    let frame: Vec<(f64, f64)> = if flipped {
        sheets.iter().map(|&(l, w)| (w, l)).collect()
    } else {
        sheets.to_vec()
    };

    let mut groups: Vec<(f64, Vec<Box2D>)> = Vec::new();
    for mut b in boxes {
        if flipped {
            b.flip();
        }
        match groups
            .iter_mut()
            .find(|(across, _)| (*across - b.width).abs() <= EPSILON)
        {
            Some((_, members)) => members.push(b),
            None => groups.push((b.width, vec![b])),
        }
    }

    let mut result = Vec::new();
    for (across, mut members) in groups {
        members.sort_by(|a, b| b.length.total_cmp(&a.length));
        let max_length = max_stack_length(&frame, across, rotatable);

        let mut current: Option<Box2D> = None;
        for b in members {
            current = match current {
                None => Some(b),
                Some(mut stack) => {
                    if stack.add_to_stack(b.clone(), kerf, max_length) {
                        Some(stack)
                    } else {
                        result.push(stack);
                        Some(b)
                    }
                }
            };
        }
        result.extend(current);
    }

    if flipped {
        for b in &mut result {
            b.flip();
        }
    }

    let stacks = result.iter().filter(|b| b.is_superbox).count();
    log::debug!(
        "Stacking {:?}: {} units, {} superboxes",
        mode,
        result.len(),
        stacks
    );
    result
}

/// Longest strip of cross dimension `across` that fits some sheet.
fn max_stack_length(sheets: &[(f64, f64)], across: f64, rotatable: bool) -> f64 {
    sheets
        .iter()
        .flat_map(|&(length, width)| {
            let straight = (width + EPSILON >= across).then_some(length);
            let turned = (rotatable && length + EPSILON >= across).then_some(width);
            straight.into_iter().chain(turned)
        })
        .fold(0.0, f64::max)
}

/// Lays the boxes of a placed superbox out along its strip.
///
/// Boxes follow each other from the superbox position with one kerf between
/// neighbours; a secondary cut separates each consecutive pair. Every box is
/// rotated along with a rotated superbox.
pub fn expand_superbox(
    superbox: Box2D,
    mode: StackingMode,
    kerf: f64,
    bin_index: usize,
) -> (Vec<Box2D>, Vec<Cut>) {
    if !superbox.is_superbox {
        return (vec![superbox], Vec::new());
    }

    let stacked_along_length = !matches!(mode, StackingMode::AlongWidth);
    let along_x = stacked_along_length != superbox.rotated;

    let count = superbox.sub_boxes.len();
    let mut boxes = Vec::with_capacity(count);
    let mut cuts = Vec::with_capacity(count.saturating_sub(1));
    let mut cursor = if along_x { superbox.x } else { superbox.y };

    for (i, mut sub) in superbox.sub_boxes.into_iter().enumerate() {
        if superbox.rotated {
            sub.rotate();
        }
        let extent = if along_x {
            sub.x = cursor;
            sub.y = superbox.y;
            sub.length
        } else {
            sub.x = superbox.x;
            sub.y = cursor;
            sub.width
        };

        if i + 1 < count {
            cuts.push(if along_x {
                Cut::secondary(
                    cursor + extent,
                    superbox.y,
                    superbox.width,
                    CutOrientation::Vertical,
                    bin_index,
                )
            } else {
                Cut::secondary(
                    superbox.x,
                    cursor + extent,
                    superbox.length,
                    CutOrientation::Horizontal,
                    bin_index,
                )
            });
        }

        cursor += extent + kerf;
        boxes.push(sub);
    }

    (boxes, cuts)
}
