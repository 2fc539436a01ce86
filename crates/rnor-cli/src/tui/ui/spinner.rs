use ratatui::prelude::*;

const WIDTH: usize = 6;

/// Cell lit at `frame`, bouncing between both ends.
fn scanner_position(frame: usize) -> usize {
    let cycle = 2 * (WIDTH - 1);
    let step = frame % cycle;
    if step < WIDTH {
        step
    } else {
        cycle - step
    }
}

pub fn scanner_spans(frame: usize, lit: Color, idle: Color) -> Vec<Span<'static>> {
    let position = scanner_position(frame);
    (0..WIDTH)
        .map(|i| {
            if i == position {
                Span::styled("■", Style::default().fg(lit))
            } else {
                Span::styled("⬝", Style::default().fg(idle))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_bounces() {
        let positions: Vec<usize> = (0..12).map(scanner_position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5, 4, 3, 2, 1, 0, 1]);
    }

    #[test]
    fn test_scanner_width() {
        assert_eq!(scanner_spans(3, Color::Cyan, Color::DarkGray).len(), WIDTH);
    }
}
