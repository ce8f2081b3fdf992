#![allow(non_snake_case)]

use crate::Utils::plots::RevolutionRenderer;
use crate::revolution::{
    Axis, RevolutionTask, approximate_volume, convergence_study, convergence_table, exact_volume,
};
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

#[allow(dead_code)]
pub fn revolution_examples(example: usize) {
    match example {
        0 => {
            // EXACT VOLUME
            // |x| on [-1, 1] revolved about the line y = x + 4
            let f = Expr::parse_expression("abs(x)").unwrap();
            let volume = exact_volume(&f, -1.0, 1.0, (1.0, 4.0)).unwrap();
            println!("exact volume of {} about y = x + 4: {}", f, volume);
            // the same function about the coordinate axes
            for axis in ["x", "y"] {
                let volume = exact_volume(&f, -1.0, 1.0, axis).unwrap();
                println!("exact volume of {} about {}: {}", f, axis, volume);
            }
        }
        1 => {
            // APPROXIMATE VOLUME
            // Simpson's rule with n = 6 subintervals, n must be even
            let f = Expr::parse_expression("sin(x) + x^2").unwrap();
            let volume = approximate_volume(&f, 0.0, 1.0, (2.0, 2.0), 6).unwrap();
            println!("approximate volume about y = 2x + 2: {}", volume);
            let exact = exact_volume(&f, 0.0, 1.0, (2.0, 2.0)).unwrap();
            println!("exact volume about y = 2x + 2: {}", exact);
            match approximate_volume(&f, 0.0, 1.0, Axis::XAxis, 5) {
                Ok(v) => println!("unexpected volume {}", v),
                Err(e) => println!("odd n: {}", e),
            }
        }
        2 => {
            // PICTURE
            // x^3 on [-2, 2], full turn, opens a gnuplot window as well
            let f = Expr::parse_expression("x^3").unwrap();
            let sampler = f.lambdify1D().unwrap();
            let renderer = RevolutionRenderer::new().with_samples(40);
            match renderer.plot_solid_of_revolution(
                &sampler,
                -2.0,
                2.0,
                2.0 * PI,
                "solid_of_revolution.png",
                true,
            ) {
                Ok(frame) => frame.save_to_csv("solid_of_revolution.csv").unwrap(),
                // no gnuplot or no fonts
                Err(e) => println!("{}", e),
            }
        }
        3 => {
            // ANIMATION
            // 10 frames, 500 ms each, the sweep angle grows up to a full turn
            let f = Expr::parse_expression("sin(x) + x^2").unwrap();
            let sampler = f.lambdify1D().unwrap();
            let renderer = RevolutionRenderer::new();
            let angles = RevolutionRenderer::sweep_angles(10);
            let frames = renderer.collect_frames(&sampler, -3.0, 3.0, &angles);
            renderer.save_gif(&frames, "solid_of_revolution.gif", 500).unwrap();
        }
        4 => {
            // CONVERGENCE OF SIMPSON'S RULE
            let f = Expr::parse_expression("x^3").unwrap();
            let rows = convergence_study(&f, 0.0, 2.0, Axis::XAxis, &[2, 4, 8, 16, 32, 64]).unwrap();
            println!("{}", convergence_table(&rows));
        }
        5 => {
            // TASK DOCUMENT
            let input = r#"
            # |x| about the line y = x + 4
            function
              f: "abs(x)"
            interval
              a: -1
              b: 1
            axis
              line: 1, 4
            approximation
              n: 100
            logging
              level: info
            "#;
            let task: RevolutionTask = input.parse().unwrap();
            let report = task.solve().unwrap();
            println!("{}", report);
        }
        _ => {
            println!("no such example");
        }
    }
}
