use crate::models::{constants::PhysicalConstants, rocket::RocketEvent};
use crate::simulation::SimulationError;

/// 発射済みロケットを差し引いた残存質量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassBudget {
    /// 機体質量[kg]
    pub airframe_mass: f64,
    /// 発射筒・ペイロード質量[kg]
    pub tube_mass: f64,
}

impl MassBudget {
    /// 発射済みロケット列から残存質量を求める
    ///
    /// どちらかの質量が負になる構成はエラー。
    pub fn after_launches(constants: &PhysicalConstants, launched: &[RocketEvent]) -> Result<Self, SimulationError> {
        let released: f64 = launched.iter().map(|r| r.mass).sum();
        let budget = Self {
            airframe_mass: constants.m_all - released,
            tube_mass: constants.tube_mass - launched.len() as f64 * constants.m_part,
        };

        if budget.airframe_mass < 0.0 {
            return Err(SimulationError::NegativeMass(format!(
                "機体質量 {:.3}kg ({}発発射後)",
                budget.airframe_mass,
                launched.len()
            )));
        }
        if budget.tube_mass < 0.0 {
            return Err(SimulationError::NegativeMass(format!(
                "発射筒質量 {:.3}kg ({}発発射後)",
                budget.tube_mass,
                launched.len()
            )));
        }

        Ok(budget)
    }

    /// 機体項 + 発射筒項 + 燃焼中ロケットの寄与
    pub fn moment_of_inertia(&self, constants: &PhysicalConstants, burning_contribution: f64) -> f64 {
        let airframe = if constants.m_all > 0.0 {
            constants.airframe_inertia * self.airframe_mass / constants.m_all
        } else {
            0.0
        };
        let tube = self.tube_mass * constants.tube_arm * constants.tube_arm + burning_contribution;
        airframe + tube
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::SimTime;
    use approx::assert_relative_eq;

    fn salvo() -> Vec<RocketEvent> {
        vec![
            RocketEvent::new("R1".to_string(), SimTime::from_millis(4000), 15, 15.0),
            RocketEvent::new("R2".to_string(), SimTime::from_millis(8000), 15, 15.0),
        ]
    }

    #[test]
    fn test_full_load_inertia() {
        let c = PhysicalConstants::default();
        let budget = MassBudget::after_launches(&c, &[]).unwrap();
        assert_eq!(budget.airframe_mass, 50.0);
        assert_relative_eq!(budget.moment_of_inertia(&c, 0.0), 38.8, epsilon = 1e-12);
    }

    #[test]
    fn test_inertia_drops_after_launches() {
        let c = PhysicalConstants::default();
        let rockets = salvo();
        let one = MassBudget::after_launches(&c, &rockets[..1]).unwrap();
        let two = MassBudget::after_launches(&c, &rockets).unwrap();

        assert_eq!(one.airframe_mass, 35.0);
        assert_eq!(two.airframe_mass, 20.0);
        assert_relative_eq!(two.tube_mass, 2.4, epsilon = 1e-12);
        assert!(one.moment_of_inertia(&c, 0.0) < 38.8);
        assert!(two.moment_of_inertia(&c, 0.0) < one.moment_of_inertia(&c, 0.0));
        assert!(two.moment_of_inertia(&c, 0.0) > 0.0);
    }

    #[test]
    fn test_burning_contribution_is_added() {
        let c = PhysicalConstants::default();
        let budget = MassBudget::after_launches(&c, &[]).unwrap();
        assert_relative_eq!(budget.moment_of_inertia(&c, 1.5), 40.3, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_mass_rejected() {
        let c = PhysicalConstants::default();
        let heavy = vec![RocketEvent::new("H".to_string(), SimTime::from_millis(1000), 15, 60.0)];
        assert!(matches!(
            MassBudget::after_launches(&c, &heavy),
            Err(SimulationError::NegativeMass(_))
        ));
    }
}
