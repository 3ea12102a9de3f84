use hog_image::Image;

use crate::{
    cell::CellHistograms, error::HogError, gradient::GradientField, pipeline::HogDescriptor,
    polar::PolarField,
};

/// Receives the intermediate artifacts of a descriptor computation.
///
/// The pipeline calls the hooks in order: input intensities, gradients,
/// polar field, cell histograms and finally the descriptor. All the hooks default to doing
/// nothing. Returning an error aborts the computation and the error is
/// returned to the caller.
///
/// # Examples
///
/// ```
/// use hog_descriptor::{HogDescriptor, HogError, HogObserver};
///
/// #[derive(Default)]
/// struct CountFeatures(usize);
///
/// impl HogObserver for CountFeatures {
///     fn on_features(&mut self, descriptor: &HogDescriptor) -> Result<(), HogError> {
///         self.0 = descriptor.len();
///         Ok(())
///     }
/// }
/// ```
pub trait HogObserver {
    /// Called with the input intensities once the configuration is validated.
    fn on_input(&mut self, _image: &Image<f32, 1>) -> Result<(), HogError> {
        Ok(())
    }

    /// Called with the horizontal and vertical differences.
    fn on_gradients(&mut self, _gradient: &GradientField) -> Result<(), HogError> {
        Ok(())
    }

    /// Called with the magnitudes and angles.
    fn on_polar(&mut self, _polar: &PolarField) -> Result<(), HogError> {
        Ok(())
    }

    /// Called with the per-cell histograms, before block normalization.
    fn on_cell_histograms(&mut self, _hist: &CellHistograms) -> Result<(), HogError> {
        Ok(())
    }

    /// Called with the final descriptor.
    fn on_features(&mut self, _descriptor: &HogDescriptor) -> Result<(), HogError> {
        Ok(())
    }
}

impl<O: HogObserver + ?Sized> HogObserver for &mut O {
    fn on_input(&mut self, image: &Image<f32, 1>) -> Result<(), HogError> {
        (**self).on_input(image)
    }

    fn on_gradients(&mut self, gradient: &GradientField) -> Result<(), HogError> {
        (**self).on_gradients(gradient)
    }

    fn on_polar(&mut self, polar: &PolarField) -> Result<(), HogError> {
        (**self).on_polar(polar)
    }

    fn on_cell_histograms(&mut self, hist: &CellHistograms) -> Result<(), HogError> {
        (**self).on_cell_histograms(hist)
    }

    fn on_features(&mut self, descriptor: &HogDescriptor) -> Result<(), HogError> {
        (**self).on_features(descriptor)
    }
}

/// Two observers notified one after the other.
///
/// The second observer is skipped when the first one fails.
impl<A: HogObserver, B: HogObserver> HogObserver for (A, B) {
    fn on_input(&mut self, image: &Image<f32, 1>) -> Result<(), HogError> {
        self.0.on_input(image)?;
        self.1.on_input(image)
    }

    fn on_gradients(&mut self, gradient: &GradientField) -> Result<(), HogError> {
        self.0.on_gradients(gradient)?;
        self.1.on_gradients(gradient)
    }

    fn on_polar(&mut self, polar: &PolarField) -> Result<(), HogError> {
        self.0.on_polar(polar)?;
        self.1.on_polar(polar)
    }

    fn on_cell_histograms(&mut self, hist: &CellHistograms) -> Result<(), HogError> {
        self.0.on_cell_histograms(hist)?;
        self.1.on_cell_histograms(hist)
    }

    fn on_features(&mut self, descriptor: &HogDescriptor) -> Result<(), HogError> {
        self.0.on_features(descriptor)?;
        self.1.on_features(descriptor)
    }
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl HogObserver for NoopObserver {}

/// An observer that keeps a copy of every artifact.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// The recorded input intensities.
    pub input: Option<Image<f32, 1>>,
    /// The recorded gradient field.
    pub gradient: Option<GradientField>,
    /// The recorded polar field.
    pub polar: Option<PolarField>,
    /// The recorded cell histograms.
    pub histograms: Option<CellHistograms>,
    /// The recorded descriptor.
    pub descriptor: Option<HogDescriptor>,
}

impl HogObserver for RecordingObserver {
    fn on_input(&mut self, image: &Image<f32, 1>) -> Result<(), HogError> {
        self.input = Some(image.clone());
        Ok(())
    }

    fn on_gradients(&mut self, gradient: &GradientField) -> Result<(), HogError> {
        self.gradient = Some(gradient.clone());
        Ok(())
    }

    fn on_polar(&mut self, polar: &PolarField) -> Result<(), HogError> {
        self.polar = Some(polar.clone());
        Ok(())
    }

    fn on_cell_histograms(&mut self, hist: &CellHistograms) -> Result<(), HogError> {
        self.histograms = Some(hist.clone());
        Ok(())
    }

    fn on_features(&mut self, descriptor: &HogDescriptor) -> Result<(), HogError> {
        self.descriptor = Some(descriptor.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HogConfig, HogPipeline};
    use hog_image::ImageSize;

    #[derive(Default)]
    struct StageLog(Vec<&'static str>);

    impl HogObserver for StageLog {
        fn on_input(&mut self, _image: &Image<f32, 1>) -> Result<(), HogError> {
            self.0.push("input");
            Ok(())
        }

        fn on_gradients(&mut self, _gradient: &GradientField) -> Result<(), HogError> {
            self.0.push("gradients");
            Ok(())
        }

        fn on_polar(&mut self, _polar: &PolarField) -> Result<(), HogError> {
            self.0.push("polar");
            Ok(())
        }

        fn on_cell_histograms(&mut self, _hist: &CellHistograms) -> Result<(), HogError> {
            self.0.push("histograms");
            Ok(())
        }

        fn on_features(&mut self, _descriptor: &HogDescriptor) -> Result<(), HogError> {
            self.0.push("features");
            Ok(())
        }
    }

    #[test]
    fn test_observer_pair() -> Result<(), HogError> {
        let image = Image::<f32, 1>::from_size_val(ImageSize::new(16, 16), 0.0)?;
        let pipeline = HogPipeline::new(HogConfig::default())?;

        let mut stages = StageLog::default();
        let mut recorder = RecordingObserver::default();
        pipeline.compute_with_observer(&image, &mut (&mut stages, &mut recorder))?;

        assert_eq!(
            stages.0,
            vec!["input", "gradients", "polar", "histograms", "features"]
        );
        assert_eq!(recorder.input, Some(image));
        assert!(recorder.gradient.is_some());
        assert!(recorder.polar.is_some());
        assert!(recorder.histograms.is_some());
        assert!(recorder.descriptor.is_some());

        Ok(())
    }
}
