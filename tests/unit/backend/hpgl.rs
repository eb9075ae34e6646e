use std::cell::RefCell;
use std::rc::Rc;

use super::*;
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

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn plotter(buf: &SharedBuf, params: PlotterParams) -> Plotter<HpglBackend> {
    Plotter::new(HpglBackend::new(Box::new(buf.clone()), &params), params)
}

#[test]
fn pens_are_picked_by_nearest_color() {
    let mut b = HpglBackend::new(Box::new(std::io::sink()), &PlotterParams::new());
    let m = Messenger::default();
    assert_eq!(
        b.resolve_pen_color(Rgb48::from_rgb8(200, 10, 10), &m),
        DeviceColor::Indexed(2)
    );
    assert_eq!(
        b.resolve_pen_color(Rgb48::from_rgb8(250, 250, 10), &m),
        DeviceColor::Indexed(4)
    );
    assert_eq!(b.resolve_pen_color(Rgb48::WHITE, &m), DeviceColor::Indexed(0));
}

#[test]
fn letter_page_maps_the_unit_square_onto_a_square_area() {
    let b = HpglBackend::new(Box::new(std::io::sink()), &PlotterParams::new());
    let side = 215.9 * 0.8 * 40.0;
    let p = b.ndc_to_device() * Point::new(1.0, 1.0);
    assert!((p.x - side).abs() < 1e-9 && (p.y - side).abs() < 1e-9);
}

#[test]
fn circles_are_native_under_uniform_scaling() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf, PlotterParams::new());
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 1.0, 1.0).unwrap();
    p.fcircle(0.5, 0.5, 0.25).unwrap();
    p.closepl().unwrap();

    let out = buf.text();
    assert!(out.starts_with("IN;"));
    assert!(out.contains("CI"));
    assert!(out.trim_end().ends_with("PG0;"));
}

#[test]
fn stretched_circles_become_polylines() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf, PlotterParams::new());
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 2.0, 1.0).unwrap();
    p.fcircle(1.0, 0.5, 0.25).unwrap();
    p.closepl().unwrap();

    let out = buf.text();
    assert!(!out.contains("CI"));
    assert!(out.matches("PD").count() > 8);
}

#[test]
fn arcs_use_arc_absolute() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf, PlotterParams::new());
    p.openpl().unwrap();
    p.farc(0.5, 0.5, 0.75, 0.5, 0.5, 0.75).unwrap();
    p.endpath().unwrap();
    p.closepl().unwrap();

    let out = buf.text();
    assert!(out.contains(",90.00;"), "{out}");
}

#[test]
fn mirrored_space_reverses_the_arc_sweep() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf, PlotterParams::new());
    p.openpl().unwrap();
    p.fspace(1.0, 0.0, 0.0, 1.0).unwrap();
    p.farc(0.5, 0.5, 0.75, 0.5, 0.5, 0.75).unwrap();
    p.endpath().unwrap();
    p.closepl().unwrap();

    let out = buf.text();
    assert!(out.contains("AA3454,3454,-90.00;"), "{out}");
}

#[test]
fn version_one_has_no_pen_width() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf, PlotterParams::new().with("HPGL_VERSION", "1"));
    assert_eq!(p.backend().version(), 1);
    p.openpl().unwrap();
    p.fline(0.1, 0.1, 0.9, 0.9).unwrap();
    p.closepl().unwrap();

    let out = buf.text();
    assert!(!out.contains("PW"));
    assert!(out.contains("LT;"));
}

#[test]
fn labels_are_terminated() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf, PlotterParams::new());
    p.openpl().unwrap();
    p.fmove(0.5, 0.5).unwrap();
    p.label("HI").unwrap();
    p.closepl().unwrap();

    assert!(buf.text().contains("LBHI\u{3};"));
}
