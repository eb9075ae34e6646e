use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::message::Severity;
use crate::plotter::Plotter;

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

const BLACK: Rgb24 = Rgb24([0, 0, 0]);
const RED: Rgb24 = Rgb24([255, 0, 0]);

fn plotter(buf: &SharedBuf) -> Plotter<BitmapBackend> {
    let params = PlotterParams::new().with("BITMAPSIZE", "11x11");
    Plotter::new(BitmapBackend::new(Box::new(buf.clone()), &params), params)
}

#[test]
fn horizontal_line_sets_one_row() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 10.0, 10.0).unwrap();
    p.fline(0.0, 5.0, 10.0, 5.0).unwrap();
    p.endpath().unwrap();

    let b = p.backend();
    for x in 0..11 {
        assert_eq!(b.pixel(x, 5), Some(BLACK));
    }
    assert_eq!(b.pixel(5, 4), Some(Rgb24::WHITE));
    assert_eq!(b.pixel(5, 6), Some(Rgb24::WHITE));
}

#[test]
fn lines_leaving_the_canvas_are_clipped() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 10.0, 10.0).unwrap();
    p.fline(-20.0, 0.0, 30.0, 0.0).unwrap();
    p.endpath().unwrap();

    let b = p.backend();
    assert_eq!(b.pixel(0, 10), Some(BLACK));
    assert_eq!(b.pixel(10, 10), Some(BLACK));
}

#[test]
fn filled_box_covers_its_interior() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 10.0, 10.0).unwrap();
    p.fillcolor(0xffff, 0, 0).unwrap();
    p.filltype(1).unwrap();
    p.pentype(0).unwrap();
    p.fbox(2.0, 2.0, 8.0, 8.0).unwrap();

    let b = p.backend();
    // device rows run top-down, so user y = 5 is row 5
    assert_eq!(b.pixel(5, 5), Some(RED));
    assert_eq!(b.pixel(1, 5), Some(Rgb24::WHITE));
    assert_eq!(b.pixel(5, 1), Some(Rgb24::WHITE));
}

#[test]
fn full_color_table_falls_back_with_one_warning() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let seen = warnings.clone();
    let messenger = Messenger::new(Some(Arc::new(move |_: Severity, _: &str| {
        seen.fetch_add(1, Ordering::SeqCst);
    })));
    let mut b = BitmapBackend::new(Box::new(SharedBuf::default()), &PlotterParams::new());
    b.open_page(1, &messenger).unwrap();

    // white is already entry 0, so the last of these overflows
    for i in 0..=255u8 {
        b.resolve_pen_color(Rgb48::from_rgb8(i, 1, 0), &messenger);
    }
    b.resolve_pen_color(Rgb48::from_rgb8(7, 7, 7), &messenger);
    assert_eq!(b.color_table().entries().len(), COLOR_TABLE_SIZE);
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}

#[test]
fn oversized_canvas_falls_back_to_the_default_with_a_warning() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let seen = warnings.clone();
    let messenger = Messenger::new(Some(Arc::new(move |sev: Severity, msg: &str| {
        assert_eq!(sev, Severity::Warning);
        assert!(msg.contains("100000x100000"));
        seen.fetch_add(1, Ordering::SeqCst);
    })));
    let params = PlotterParams::new().with("BITMAPSIZE", "100000x100000");
    let mut b = BitmapBackend::new(Box::new(SharedBuf::default()), &params);
    assert_eq!(b.size(), (570, 570));

    b.open_page(1, &messenger).unwrap();
    b.close_page(&messenger).unwrap();
    b.open_page(2, &messenger).unwrap();
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
    assert_eq!(b.pixel(569, 569), Some(Rgb24::WHITE));
}

#[test]
fn close_writes_a_png() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fpoint(0.5, 0.5).unwrap();
    p.closepl().unwrap();

    let bytes = buf.0.borrow().clone();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (11, 11));
    assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0]);
}
