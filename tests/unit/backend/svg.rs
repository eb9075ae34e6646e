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

fn plotter(buf: &SharedBuf) -> Plotter<SvgBackend> {
    plotter_sized(buf, "100x50")
}

fn plotter_sized(buf: &SharedBuf, size: &str) -> Plotter<SvgBackend> {
    let params = PlotterParams::new().with("BITMAPSIZE", size);
    Plotter::new(SvgBackend::new(Box::new(buf.clone()), &params), params)
}

#[test]
fn document_has_size_background_and_a_path() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 10.0, 10.0).unwrap();
    p.fline(0.0, 0.0, 10.0, 10.0).unwrap();
    p.closepl().unwrap();

    let svg = buf.text();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains(r#"width="100" height="50""#));
    assert!(svg.contains(r##"fill="#ffffff""##));
    assert!(svg.contains(r#"d="M0,0 L10,10""#));
    assert!(svg.contains(r#"transform="matrix(10 0 0 -5 0 50)""#));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn circles_stay_primitive_and_filled() {
    let buf = SharedBuf::default();
    let mut p = plotter_sized(&buf, "100x100");
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 10.0, 10.0).unwrap();
    p.fillcolorname("red").unwrap();
    p.filltype(1).unwrap();
    p.fcircle(5.0, 5.0, 2.0).unwrap();
    p.closepl().unwrap();

    let svg = buf.text();
    assert!(svg.contains(r#"<circle transform="#));
    assert!(svg.contains(r#"r="2""#));
    assert!(svg.contains(r##"fill="#ff0000""##));
}

#[test]
fn only_the_first_page_is_written() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.closepl().unwrap();
    p.openpl().unwrap();
    p.fline(0.0, 0.0, 1.0, 1.0).unwrap();
    p.closepl().unwrap();

    let svg = buf.text();
    assert_eq!(svg.matches("<svg").count(), 1);
    assert!(!svg.contains("<path"));
}

#[test]
fn labels_are_escaped_and_anchored() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fmove(0.5, 0.5).unwrap();
    p.alabel('c', 'x', "a<b").unwrap();
    p.closepl().unwrap();

    let svg = buf.text();
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(">a&lt;b</text>"));
}

#[test]
fn anisotropic_display_turns_circles_into_curves() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 10.0, 10.0).unwrap();
    p.fcircle(5.0, 5.0, 2.0).unwrap();
    p.closepl().unwrap();

    let svg = buf.text();
    assert!(!svg.contains("<circle transform"));
    assert!(svg.contains(" C"));
}

#[test]
fn huge_coordinate_windows_keep_their_scale() {
    let buf = SharedBuf::default();
    let mut p = plotter_sized(&buf, "570x570");
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 1e6, 1e6).unwrap();
    p.fline(0.0, 0.0, 1e6, 1e6).unwrap();
    p.closepl().unwrap();

    let svg = buf.text();
    assert!(svg.contains(r#"transform="matrix(0.00057 0 0 -0.00057 0 570)""#));
    assert!(svg.contains(r#"d="M0,0 L1000000,1000000""#));
}

#[test]
fn tiny_coordinate_windows_keep_geometry_and_stroke() {
    let buf = SharedBuf::default();
    let mut p = plotter_sized(&buf, "570x570");
    p.openpl().unwrap();
    p.fspace(0.0, 0.0, 0.001, 0.001).unwrap();
    p.fline(0.00012, 0.00012, 0.00088, 0.00044).unwrap();
    p.closepl().unwrap();

    let svg = buf.text();
    assert!(svg.contains(r#"d="M0.00012,0.00012 L0.00088,0.00044""#));
    assert!(!svg.contains(r#"stroke-width="0""#));
}

#[test]
fn font_names_are_escaped_in_attributes() {
    let buf = SharedBuf::default();
    let mut p = plotter(&buf);
    p.openpl().unwrap();
    p.fontname("A&B").unwrap();
    p.fmove(0.5, 0.5).unwrap();
    p.label("x").unwrap();
    p.closepl().unwrap();

    assert!(buf.text().contains(r#"font-family="A&amp;B""#));
}
