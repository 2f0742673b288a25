//! End-to-end layout checks against the deterministic text surface.

use image::{Rgb, RgbImage};
use proofsheet::{
    DeterministicTextSurface, Padding, TextWrapper, TypesetOptions, Typesetting, GreedyWrapper,
    make_captioned_grid, make_grid_captioner, make_typesetting,
};

fn surface() -> DeterministicTextSurface {
    // chartop/charleft zeroed so positions are easy to reason about:
    // charw 6, charh 10, line_spacing 2.
    DeterministicTextSurface {
        charw: 6,
        charh: 10,
        chartop: 0,
        charleft: 0,
        line_advance: 12,
    }
}

fn typesetting(x_wrap_px: u32, padding: Padding) -> Typesetting<()> {
    make_typesetting(
        &surface(),
        (),
        x_wrap_px,
        TypesetOptions {
            padding,
            ..Default::default()
        },
    )
    .unwrap()
}

fn solid_imgs(colors: &[[u8; 3]], w: u32, h: u32) -> Vec<RgbImage> {
    colors
        .iter()
        .map(|color| RgbImage::from_pixel(w, h, Rgb(*color)))
        .collect()
}

#[test]
fn four_samples_in_two_columns_make_two_rows() {
    let surface = surface();
    let cell = typesetting(50, Padding::ZERO);
    let imgs = solid_imgs(
        &[[200, 0, 0], [0, 200, 0], [0, 0, 200], [200, 200, 0]],
        50,
        50,
    );
    let long = "a very long caption that definitely wraps across multiple lines";
    let captions = ["a", long, "b", "c"];

    let canvas =
        make_captioned_grid(&surface, &cell, 2, 50, 50, &imgs, &captions, None, None).unwrap();

    // Row 0's text height comes from the long caption's wrap count, row 1's
    // from a single line; wrap column count is 50 / 6 = 8.
    let long_lines = GreedyWrapper::new(8).wrap(long).len() as u32;
    assert!(long_lines > 1);
    let row0 = long_lines * 10 + (long_lines - 1) * 2;
    let row1 = 10;
    assert_eq!(canvas.width(), 100);
    assert_eq!(canvas.height(), row0 + row1 + 2 * 50);

    // Row 0 images start right below the row's shared caption block.
    assert_eq!(*canvas.get_pixel(0, row0), Rgb([200, 0, 0]));
    assert_eq!(*canvas.get_pixel(50, row0), Rgb([0, 200, 0]));
    // Row 1 images start below row 0's cells plus row 1's caption line.
    let row1_imgs_y = row0 + 50 + row1;
    assert_eq!(*canvas.get_pixel(0, row1_imgs_y), Rgb([0, 0, 200]));
    assert_eq!(*canvas.get_pixel(50, row1_imgs_y), Rgb([200, 200, 0]));
}

#[test]
fn identical_inputs_compose_identical_canvases() {
    let surface = surface();
    let cell = typesetting(40, Padding::uniform(2));
    let title = typesetting(80, Padding::uniform(3));
    let first = solid_imgs(&[[10, 20, 30], [40, 50, 60]], 40, 30);
    // Distinct buffers with equal pixel content.
    let second = solid_imgs(&[[10, 20, 30], [40, 50, 60]], 40, 30);
    let captions = ["alpha sample", "beta sample"];

    let a = make_captioned_grid(
        &surface,
        &cell,
        2,
        40,
        30,
        &first,
        &captions,
        Some(&title),
        Some("run 1 gallery"),
    )
    .unwrap();
    let b = make_captioned_grid(
        &surface,
        &cell,
        2,
        40,
        30,
        &second,
        &captions,
        Some(&title),
        Some("run 1 gallery"),
    )
    .unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn captioner_binds_layout_parameters_once() {
    let cell = typesetting(48, Padding::ZERO);
    let title = typesetting(96, Padding::uniform(2));
    let captioner = make_grid_captioner(surface(), cell, 2, 48, 32, Some(title));

    let imgs = solid_imgs(&[[1, 2, 3], [4, 5, 6]], 48, 32);
    let captions = ["one", "two"];

    let untitled = captioner.caption(&imgs, &captions, None).unwrap();
    let titled = captioner.caption(&imgs, &captions, Some("sheet")).unwrap();

    // The title block adds 2 + 2 padding plus one 10px line.
    assert_eq!(titled.height(), untitled.height() + 14);
    assert_eq!(titled.width(), untitled.width());

    // Reuse is safe: a second identical call matches the first.
    let again = captioner.caption(&imgs, &captions, None).unwrap();
    assert_eq!(again.as_raw(), untitled.as_raw());
}

#[test]
fn all_empty_captions_collapse_the_text_row() {
    let surface = surface();
    let cell = typesetting(48, Padding::ZERO);
    let imgs = solid_imgs(&[[9, 9, 9], [7, 7, 7]], 48, 32);
    let canvas =
        make_captioned_grid(&surface, &cell, 2, 48, 32, &imgs, &["", ""], None, None).unwrap();
    // No caption lines anywhere: the canvas is exactly one image tall.
    assert_eq!(canvas.height(), 32);
    assert_eq!(*canvas.get_pixel(0, 0), Rgb([9, 9, 9]));
}
