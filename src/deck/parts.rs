//! Builders for the presentation, slide-master and slide XML trees.
//!
//! Each builder returns an [`Element`] root; the package assembler adds the
//! XML declaration when the part is written.

use super::model::{Presentation, SLIDE_MASTER_ID, Slide, TransitionEffect};
use crate::imaging::{GeometryError, Placement};
use crate::package::constants::namespace;
use crate::types::Canvas;
use crate::xml::Element;

/// Portrait letter-size notes page, the size every viewer expects.
const NOTES_WIDTH: i64 = 6_858_000;
const NOTES_HEIGHT: i64 = 9_144_000;

fn with_namespaces(root: Element) -> Element {
    root.attr("xmlns:a", namespace::DML_MAIN)
        .attr("xmlns:r", namespace::OFC_RELATIONSHIPS)
        .attr("xmlns:p", namespace::PML_MAIN)
}

/// `ppt/presentation.xml`: master list, slide list in slide order, sizes.
///
/// `slide_rel_ids[i]` is the presentation's relationship id for slide `i`.
pub fn presentation_tree(
    presentation: &Presentation,
    master_rel_id: &str,
    slide_rel_ids: &[String],
) -> Element {
    let slide_ids = presentation
        .slides()
        .iter()
        .zip(slide_rel_ids)
        .map(|(slide, rel_id)| {
            Element::new("p:sldId")
                .attr("id", slide.serialized_id())
                .attr("r:id", rel_id)
        });

    with_namespaces(Element::new("p:presentation"))
        .attr("saveSubsetFonts", "1")
        .child(
            Element::new("p:sldMasterIdLst").child(
                Element::new("p:sldMasterId")
                    .attr("id", SLIDE_MASTER_ID)
                    .attr("r:id", master_rel_id),
            ),
        )
        .child(Element::new("p:sldIdLst").children_from(slide_ids))
        .child(
            Element::new("p:sldSz")
                .attr("cx", presentation.canvas.width)
                .attr("cy", presentation.canvas.height),
        )
        .child(
            Element::new("p:notesSz")
                .attr("cx", NOTES_WIDTH)
                .attr("cy", NOTES_HEIGHT),
        )
}

/// `ppt/slideMasters/slideMaster1.xml`: empty shape tree, standard color map,
/// no layouts.
pub fn slide_master_tree() -> Element {
    let color_map = [
        ("bg1", "lt1"),
        ("tx1", "dk1"),
        ("bg2", "lt2"),
        ("tx2", "dk2"),
        ("accent1", "accent1"),
        ("accent2", "accent2"),
        ("accent3", "accent3"),
        ("accent4", "accent4"),
        ("accent5", "accent5"),
        ("accent6", "accent6"),
        ("hlink", "hlink"),
        ("folHlink", "folHlink"),
    ]
    .into_iter()
    .fold(Element::new("p:clrMap"), |el, (k, v)| el.attr(k, v));

    with_namespaces(Element::new("p:sldMaster"))
        .child(Element::new("p:cSld").child(group_shape_tree(false)))
        .child(color_map)
        .child(Element::new("p:sldLayoutIdLst"))
}

/// `ppt/slides/slideN.xml`: background rectangle, picture, fade transition
/// and the auto-advance timing.
pub fn slide_tree(
    slide: &Slide,
    canvas: Canvas,
    image_rel_id: &str,
) -> Result<Element, GeometryError> {
    let placement = slide.picture.placement(canvas)?;
    let full_canvas = Placement {
        offset_x: 0,
        offset_y: 0,
        extent_width: canvas.width,
        extent_height: canvas.height,
    };

    let background = Element::new("p:sp")
        .child(
            Element::new("p:nvSpPr")
                .child(
                    Element::new("p:cNvPr")
                        .attr("id", 2)
                        .attr("name", "Background"),
                )
                .child(
                    Element::new("p:cNvSpPr")
                        .child(Element::new("a:spLocks").attr("noGrp", "1")),
                )
                .child(Element::new("p:nvPr")),
        )
        .child(
            Element::new("p:spPr")
                .child(xfrm(full_canvas))
                .child(rect_geometry())
                .child(
                    Element::new("a:solidFill").child(
                        Element::new("a:srgbClr").attr("val", slide.background.to_hex()),
                    ),
                )
                .child(Element::new("a:ln").child(Element::new("a:noFill"))),
        );

    let file_name = slide
        .picture
        .source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let picture = Element::new("p:pic")
        .child(
            Element::new("p:nvPicPr")
                .child(
                    Element::new("p:cNvPr")
                        .attr("id", 3)
                        .attr("name", format!("Picture {}", slide.id))
                        .attr("descr", file_name),
                )
                .child(
                    Element::new("p:cNvPicPr").child(
                        Element::new("a:picLocks")
                            .attr("noChangeAspect", "1")
                            .attr("noResize", "1"),
                    ),
                )
                .child(Element::new("p:nvPr")),
        )
        .child(
            Element::new("p:blipFill")
                .child(
                    Element::new("a:blip")
                        .attr("r:embed", image_rel_id)
                        .attr("cstate", "print"),
                )
                .child(Element::new("a:stretch").child(Element::new("a:fillRect"))),
        )
        .child(
            Element::new("p:spPr")
                .child(xfrm(placement))
                .child(rect_geometry()),
        );

    let shape_tree = group_shape_tree(true)
        .child(background)
        .child(picture);

    Ok(with_namespaces(Element::new("p:sld"))
        .child(Element::new("p:cSld").child(shape_tree))
        .child(Element::new("p:clrMapOvr").child(Element::new("a:masterClrMapping")))
        .child(transition(slide))
        .child(timing(slide)))
}

/// `<p:spTree>` with its non-visual group header. Slides carry an identity
/// group transform (all zeros); the master leaves the group properties empty.
fn group_shape_tree(with_transform: bool) -> Element {
    let header = Element::new("p:nvGrpSpPr")
        .child(Element::new("p:cNvPr").attr("id", 1).attr("name", ""))
        .child(Element::new("p:cNvGrpSpPr"))
        .child(Element::new("p:nvPr"));

    let group_props = if with_transform {
        Element::new("p:grpSpPr").child(
            Element::new("a:xfrm")
                .child(Element::new("a:off").attr("x", 0).attr("y", 0))
                .child(Element::new("a:ext").attr("cx", 0).attr("cy", 0))
                .child(Element::new("a:chOff").attr("x", 0).attr("y", 0))
                .child(Element::new("a:chExt").attr("cx", 0).attr("cy", 0)),
        )
    } else {
        Element::new("p:grpSpPr")
    };

    Element::new("p:spTree").child(header).child(group_props)
}

fn xfrm(p: Placement) -> Element {
    Element::new("a:xfrm")
        .child(
            Element::new("a:off")
                .attr("x", p.offset_x)
                .attr("y", p.offset_y),
        )
        .child(
            Element::new("a:ext")
                .attr("cx", p.extent_width)
                .attr("cy", p.extent_height),
        )
}

fn rect_geometry() -> Element {
    Element::new("a:prstGeom")
        .attr("prst", "rect")
        .child(Element::new("a:avLst"))
}

fn transition(slide: &Slide) -> Element {
    let effect = match slide.transition.effect {
        TransitionEffect::Fade => Element::new("p:fade"),
    };
    Element::new("p:transition")
        .attr("spd", "med")
        .attr("advClick", if slide.transition.advance_on_click { "1" } else { "0" })
        .attr("advTm", slide.transition.advance_after_millis())
        .child(effect)
}

fn timing(slide: &Slide) -> Element {
    let duration_ms = slide.duration_seconds as u64 * 1000;
    Element::new("p:timing").child(
        Element::new("p:tnLst").child(
            Element::new("p:par").child(
                Element::new("p:cTn")
                    .attr("id", 1)
                    .attr("dur", duration_ms)
                    .attr("restart", "never")
                    .attr("fill", "transition"),
            ),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::model::Picture;
    use crate::types::Color;
    use std::path::PathBuf;

    fn presentation_with(sizes: &[(u32, u32)]) -> Presentation {
        let mut pres = Presentation::new(Canvas::WIDESCREEN);
        for (i, &(w, h)) in sizes.iter().enumerate() {
            pres.push_slide(
                Picture {
                    source_path: PathBuf::from(format!("/photos/{i:03}.jpg")),
                    pixel_width: w,
                    pixel_height: h,
                },
                Color::BLACK,
                5,
            );
        }
        pres
    }

    #[test]
    fn presentation_lists_slides_in_order() {
        let pres = presentation_with(&[(800, 600), (1920, 1080)]);
        let tree = presentation_tree(&pres, "rId1", &["rId2".into(), "rId3".into()]);

        let master = tree.find("p:sldMasterIdLst").unwrap().find("p:sldMasterId").unwrap();
        assert_eq!(master.get_attr("id"), Some("2147483648"));
        assert_eq!(master.get_attr("r:id"), Some("rId1"));

        let ids: Vec<(&str, &str)> = tree
            .find("p:sldIdLst")
            .unwrap()
            .child_elements()
            .map(|e| (e.get_attr("id").unwrap(), e.get_attr("r:id").unwrap()))
            .collect();
        assert_eq!(ids, vec![("256", "rId2"), ("257", "rId3")]);

        let size = tree.find("p:sldSz").unwrap();
        assert_eq!(size.get_attr("cx"), Some("12192000"));
        assert_eq!(size.get_attr("cy"), Some("6858000"));
    }

    #[test]
    fn master_has_empty_shape_tree_and_no_layouts() {
        let tree = slide_master_tree();
        let sp_tree = tree.find("p:cSld").unwrap().find("p:spTree").unwrap();
        assert_eq!(sp_tree.child_elements().count(), 2);
        assert_eq!(tree.find("p:clrMap").unwrap().get_attr("bg1"), Some("lt1"));
        assert!(tree.find("p:sldLayoutIdLst").unwrap().children().is_empty());
    }

    #[test]
    fn slide_children_are_ordered() {
        let pres = presentation_with(&[(800, 600)]);
        let tree = slide_tree(&pres.slides()[0], pres.canvas, "rId1").unwrap();
        let names: Vec<&str> = tree.child_elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["p:cSld", "p:clrMapOvr", "p:transition", "p:timing"]);
    }

    #[test]
    fn background_precedes_picture_and_covers_canvas() {
        let pres = presentation_with(&[(800, 600)]);
        let tree = slide_tree(&pres.slides()[0], pres.canvas, "rId1").unwrap();
        let sp_tree = tree.find("p:cSld").unwrap().find("p:spTree").unwrap();
        let names: Vec<&str> = sp_tree.child_elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["p:nvGrpSpPr", "p:grpSpPr", "p:sp", "p:pic"]);

        let bg_ext = sp_tree
            .find("p:sp")
            .and_then(|sp| sp.find("p:spPr"))
            .and_then(|pr| pr.find("a:xfrm"))
            .and_then(|x| x.find("a:ext"))
            .unwrap();
        assert_eq!(bg_ext.get_attr("cx"), Some("12192000"));
        assert_eq!(bg_ext.get_attr("cy"), Some("6858000"));

        let xml = tree.to_xml();
        assert!(xml.contains(r#"<a:srgbClr val="000000"/>"#));
    }

    #[test]
    fn slide_group_transform_is_identity() {
        let pres = presentation_with(&[(800, 600)]);
        let tree = slide_tree(&pres.slides()[0], pres.canvas, "rId1").unwrap();
        let group_xfrm = tree
            .find("p:cSld")
            .and_then(|c| c.find("p:spTree"))
            .and_then(|t| t.find("p:grpSpPr"))
            .and_then(|g| g.find("a:xfrm"))
            .unwrap();
        for name in ["a:ext", "a:chExt"] {
            let ext = group_xfrm.find(name).unwrap();
            assert_eq!(ext.get_attr("cx"), Some("0"), "{name}");
            assert_eq!(ext.get_attr("cy"), Some("0"), "{name}");
        }
    }

    #[test]
    fn picture_uses_relationship_and_placement() {
        let pres = presentation_with(&[(800, 600)]);
        let tree = slide_tree(&pres.slides()[0], pres.canvas, "rId7").unwrap();
        let pic = tree
            .find("p:cSld")
            .and_then(|c| c.find("p:spTree"))
            .and_then(|t| t.find("p:pic"))
            .unwrap();

        let blip = pic.find("p:blipFill").and_then(|b| b.find("a:blip")).unwrap();
        assert_eq!(blip.get_attr("r:embed"), Some("rId7"));

        let locks = pic
            .find("p:nvPicPr")
            .and_then(|n| n.find("p:cNvPicPr"))
            .and_then(|n| n.find("a:picLocks"))
            .unwrap();
        assert_eq!(locks.get_attr("noChangeAspect"), Some("1"));
        assert_eq!(locks.get_attr("noResize"), Some("1"));

        let xfrm = pic.find("p:spPr").and_then(|s| s.find("a:xfrm")).unwrap();
        let off = xfrm.find("a:off").unwrap();
        let ext = xfrm.find("a:ext").unwrap();
        assert_eq!(off.get_attr("x"), Some("1524000"));
        assert_eq!(off.get_attr("y"), Some("0"));
        assert_eq!(ext.get_attr("cx"), Some("9144000"));
    }

    #[test]
    fn transition_and_timing_use_milliseconds() {
        let pres = presentation_with(&[(10, 10)]);
        let tree = slide_tree(&pres.slides()[0], pres.canvas, "rId1").unwrap();
        let transition = tree.find("p:transition").unwrap();
        assert_eq!(transition.get_attr("advClick"), Some("0"));
        assert_eq!(transition.get_attr("advTm"), Some("5000"));
        assert!(transition.find("p:fade").is_some());

        let ctn = tree
            .find("p:timing")
            .and_then(|t| t.find("p:tnLst"))
            .and_then(|t| t.find("p:par"))
            .and_then(|p| p.find("p:cTn"))
            .unwrap();
        assert_eq!(ctn.get_attr("dur"), Some("5000"));
    }

    #[test]
    fn zero_pixel_picture_is_a_geometry_error() {
        let pres = presentation_with(&[(0, 10)]);
        assert!(slide_tree(&pres.slides()[0], pres.canvas, "rId1").is_err());
    }
}
