use rand::Rng;

use crate::{Grid, GridError, Region};

pub const MAX_DENSITY: u32 = 100;

impl Grid {
    /// Regenerates the cells of `region` (the whole grid when `None`) at
    /// random, each cell becoming alive with `density_percent` percent
    /// probability. Cells outside of the region keep their state.
    ///
    /// Nothing is changed when the arguments are rejected.
    pub fn seed_random<R>(
        &mut self,
        region: Option<Region>,
        density_percent: u32,
        rng: &mut R,
    ) -> Result<u64, GridError>
    where
        R: Rng + ?Sized,
    {
        if density_percent > MAX_DENSITY {
            return Err(GridError::InvalidDensity(density_percent));
        }
        let region = match region {
            Some(region) => {
                self.check_region(region)?;
                region
            }
            None => self.region(),
        };

        let threshold = MAX_DENSITY - density_percent;
        for pos in region.positions() {
            let draw = rng.gen_range(0..MAX_DENSITY);
            self.cell_mut(pos).set_alive(draw >= threshold);
        }
        self.recount();
        Ok(self.population())
    }
}
