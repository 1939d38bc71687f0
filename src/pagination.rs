use serde::Serialize;

pub const PAGE_SIZE: usize = 12;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageControl {
    Previous { target: usize, enabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { target: usize, enabled: bool },
}

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Items on page `number` (1-based). Out-of-range pages are empty.
pub fn page<T>(items: &[T], number: usize) -> &[T] {
    if number == 0 {
        return &[];
    }
    let start = (number - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

pub fn clamp_page(number: usize, total: usize) -> usize {
    if total == 0 {
        1
    } else {
        number.clamp(1, total)
    }
}

/// Page buttons for `current` out of `total`. A single page needs no
/// controls.
pub fn controls(current: usize, total: usize) -> Vec<PageControl> {
    if total <= 1 {
        return Vec::new();
    }
    let current = clamp_page(current, total);
    let mut out = vec![PageControl::Previous {
        target: current.saturating_sub(1).max(1),
        enabled: current > 1,
    }];

    for number in 1..=total {
        let near = number + 1 >= current && number <= current + 1;
        if number == 1 || number == total || near {
            out.push(PageControl::Page {
                number,
                active: number == current,
            });
        } else if number + 2 == current || number == current + 2 {
            out.push(PageControl::Ellipsis);
        }
    }

    out.push(PageControl::Next {
        target: (current + 1).min(total),
        enabled: current < total,
    });
    out
}
