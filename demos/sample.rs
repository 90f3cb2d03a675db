use anyhow::Result;
use exactrend::encode::{self, ImageFormat};
use exactrend::rational::{rat, rat_i};
use exactrend::{
    Axis, Background, Camera, Color, ColoredTriangle, Point3, Raster, Renderer, Rotation, Scene,
    ScreenWindow, Triangle, Vector3,
};

const OOM: i32 = -6;

fn pt(x: i64, y: i64, z: i64) -> Point3 {
    Point3::new(rat_i(x), rat_i(y), rat_i(z))
}

/// Tetrahedron around `center`, one color per face.
fn tetrahedron(center: &Point3) -> Vec<ColoredTriangle> {
    let apex = center.add(&Vector3::new(rat_i(0), rat_i(18), rat_i(0)));
    let a = center.add(&Vector3::new(rat_i(-15), rat_i(-8), rat_i(-12)));
    let b = center.add(&Vector3::new(rat_i(15), rat_i(-8), rat_i(-12)));
    let c = center.add(&Vector3::new(rat_i(0), rat_i(-8), rat_i(14)));

    let faces = [
        (apex.clone(), a.clone(), b.clone(), Color::from_rgb8(220, 60, 60)),
        (apex.clone(), b.clone(), c.clone(), Color::from_rgb8(60, 200, 90)),
        (apex, c.clone(), a.clone(), Color::from_rgb8(80, 90, 230)),
        (a, b, c, Color::from_rgb8(210, 200, 80)),
    ];
    faces
        .into_iter()
        .map(|(p, q, r, col)| ColoredTriangle::new(Triangle::new(p, q, r), col))
        .collect()
}

fn ascii_preview(buf: &Raster) {
    const RAMP: &[u8] = b" .:-=+*#%@";
    // Sample every few pixels; terminal characters are roughly twice as tall
    // as they are wide.
    for row in (0..buf.height()).step_by(8) {
        let mut line = String::new();
        for col in (0..buf.width()).step_by(4) {
            let [r, g, b] = buf.get(exactrend::CellId::new(row, col));
            let luma = (r as usize * 3 + g as usize * 6 + b as usize) / 10;
            line.push(RAMP[luma * (RAMP.len() - 1) / 255] as char);
        }
        println!("{line}");
    }
}

fn main() -> Result<()> {
    let center = pt(0, 0, 20);
    let window = ScreenWindow::axis_aligned(&pt(0, 0, 0), &rat_i(100), &rat_i(75))?;
    let camera = Camera::new(pt(0, 0, -75), window, 400, 300, OOM)?;

    let mut scene = Scene::new(Vector3::new(rat_i(1), rat_i(-2), rat_i(2)), OOM)?;
    for face in tetrahedron(&center) {
        scene.push(face);
    }

    let renderer = Renderer::default();
    let bg = Background::default();
    let mut buf = Raster::new(camera.width(), camera.height());

    // A fifth of a turn per frame, five frames for a full orbit.
    let step = Rotation::new(Axis::Y, core::f64::consts::TAU / 5.0, OOM)?;

    for frame in 0..5 {
        scene.depth_sort(&camera);
        renderer.clear_screen(&bg, &mut buf);
        renderer.render(&camera, &scene, &mut buf);

        let path = format!("frame_{frame}.png");
        encode::save(&buf, path.as_ref(), ImageFormat::Png)?;
        println!("wrote {path}");
        ascii_preview(&buf);

        for face in scene.triangles_mut() {
            face.rotate(&step, &center);
        }
    }

    // Morph the whole tetrahedron halfway toward a flat sheet and render one
    // last frame.
    let sheet = Triangle::new(pt(-20, 0, 20), pt(20, 0, 20), pt(0, 1, 40));
    for face in scene.triangles_mut() {
        face.morph_toward(&sheet, &rat(1, 2));
    }
    scene.depth_sort(&camera);
    renderer.clear_screen(&bg, &mut buf);
    renderer.render(&camera, &scene, &mut buf);
    encode::save(&buf, "frame_morph.png".as_ref(), ImageFormat::Png)?;
    println!("wrote frame_morph.png");
    ascii_preview(&buf);

    Ok(())
}
