//! Clipped pixel primitives over `RgbImage`

use image::{Rgb, RgbImage};

/// Fill a rectangle; pixels outside the image are ignored
pub fn draw_filled_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());

    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Vertical line from y1 to y2 inclusive, in either order
pub fn draw_vertical_line(img: &mut RgbImage, x: u32, y1: u32, y2: u32, color: Rgb<u8>) {
    if x >= img.width() || img.height() == 0 {
        return;
    }
    let (start, end) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    for y in start..=end.min(img.height() - 1) {
        img.put_pixel(x, y, color);
    }
}

/// Horizontal line from x1 to x2 inclusive, in either order
pub fn draw_horizontal_line(img: &mut RgbImage, y: u32, x1: u32, x2: u32, color: Rgb<u8>) {
    if y >= img.height() || img.width() == 0 {
        return;
    }
    let (start, end) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    for x in start..=end.min(img.width() - 1) {
        img.put_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn test_rect_is_clipped_to_image() {
        let mut img = RgbImage::new(10, 10);
        draw_filled_rect(&mut img, 8, 8, 5, 5, RED);
        assert_eq!(*img.get_pixel(9, 9), RED);
        assert_eq!(*img.get_pixel(7, 7), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_lines_accept_reversed_endpoints() {
        let mut img = RgbImage::new(5, 5);
        draw_vertical_line(&mut img, 2, 4, 0, RED);
        draw_horizontal_line(&mut img, 0, 4, 0, RED);
        for i in 0..5 {
            assert_eq!(*img.get_pixel(2, i), RED);
            assert_eq!(*img.get_pixel(i, 0), RED);
        }
    }

    #[test]
    fn test_out_of_range_line_is_ignored() {
        let mut img = RgbImage::new(5, 5);
        draw_vertical_line(&mut img, 7, 0, 4, RED);
        draw_horizontal_line(&mut img, 9, 0, 4, RED);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
